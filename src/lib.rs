pub mod error;
pub mod validation;
pub mod config;
pub mod model;
pub mod db;
pub mod labels;
pub mod aggregate;
pub mod queries;
pub mod ops;
pub mod channel;
pub mod cli;
