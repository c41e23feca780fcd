pub mod request_log;
pub mod tracing;

pub use request_log::log_requests;
pub use tracing::init_tracing;
