pub mod schema;
pub mod columns;
pub mod cursor;
pub mod batch;
pub mod contact_repo;
