//! Application state shared across handlers.

use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter, SharedRateLimiter};
use brutal_core::limits::REQUEST_TIMEOUT_SECS;
use std::sync::Arc;
use std::time::Duration;
use store::SubmissionStore;
use tracing::debug;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Submission store (Postgres in production, mock in tests)
    pub store: Arc<dyn SubmissionStore>,
    /// Per-endpoint rate limiter
    pub rate_limiter: SharedRateLimiter,
    /// Upper bound on any single request
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self::with_rate_limit(store, RateLimitConfig::default())
    }

    /// Create with custom rate limit config.
    pub fn with_rate_limit(store: Arc<dyn SubmissionStore>, rate_config: RateLimitConfig) -> Self {
        Self {
            store,
            rate_limiter: Arc::new(RateLimiter::new(rate_config)),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Start the rate limiter cleanup background task.
    ///
    /// Complements the lazy sweep for quiet periods where no request
    /// arrives to trigger it.
    pub fn start_rate_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        let period = Duration::from_secs(rate_limiter.config().sweep_interval_secs.max(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = rate_limiter.cleanup_stale();
                debug!(removed, tracked = rate_limiter.tracked_keys(), "Rate limiter cleanup");
            }
        })
    }
}
