pub mod limiter;
pub mod middleware;
pub mod sliding_window;

pub use limiter::{Decision, RateLimitResult, RateLimiter};
pub use middleware::rate_limit_middleware;
pub use sliding_window::ClientWindowStore;
