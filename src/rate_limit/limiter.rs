use crate::config::RateLimitConfig;
use crate::rate_limit::sliding_window::ClientWindowStore;
use std::time::{Duration, Instant};

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub decision: Decision,
    /// The rate limit (max requests per window)
    pub limit: u64,
    /// Number of requests remaining in the current window
    pub remaining: u64,
    /// Current number of requests in the window
    pub current: u64,
}

/// Sliding-window rate limiter keyed by client identity.
///
/// One instance is constructed at process start and shared by every
/// in-flight request; state is pure memory and resets on restart.
pub struct RateLimiter {
    store: ClientWindowStore,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            store: ClientWindowStore::new(Duration::from_secs(config.window_seconds)),
            config,
        }
    }

    /// Record a request for the client and decide allow/deny.
    ///
    /// The request is recorded before the decision and is not rolled back
    /// on deny, so over-limit probes still count toward the window.
    pub fn check(&self, client_id: &str, now: Instant) -> RateLimitResult {
        let current = self.store.record(client_id, now) as u64;
        let limit = self.config.requests_per_window;

        let decision = if current > limit {
            Decision::Deny
        } else {
            Decision::Allow
        };

        tracing::debug!(
            client_id = %client_id,
            current = %current,
            limit = %limit,
            allowed = %decision.is_allow(),
            "Rate limit check"
        );

        RateLimitResult {
            decision,
            limit,
            remaining: limit.saturating_sub(current),
            current,
        }
    }

    /// Store-wide prune; evicts clients with no in-window requests
    pub fn prune(&self, now: Instant) {
        self.store.prune(now);
    }

    /// Number of clients currently holding state
    pub fn tracked_clients(&self) -> usize {
        self.store.tracked_clients()
    }

    pub fn window(&self) -> Duration {
        self.store.window()
    }
}
