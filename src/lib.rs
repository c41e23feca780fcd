// User Directory Library

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod rate_limit;
pub mod store;

pub use config::Config;
pub use errors::{AppError, Result};
