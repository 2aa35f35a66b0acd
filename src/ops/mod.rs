pub mod contact_ops;
pub mod avatar_ops;
