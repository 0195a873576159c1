//! Fixed-window rate limiting keyed by caller identity.

use brutal_core::limits::{
    FEEDBACK_MAX_REQUESTS, RATE_LIMIT_GRACE_SECS, RATE_LIMIT_SWEEP_INTERVAL_SECS,
    RATE_LIMIT_WINDOW_SECS, REVIEWS_MAX_REQUESTS, WAITLIST_MAX_REQUESTS,
};
use brutal_core::{ClientIdentity, Endpoint};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Quota for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateLimitPolicy {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_waitlist")]
    pub waitlist: RateLimitPolicy,
    #[serde(default = "default_feedback")]
    pub feedback: RateLimitPolicy,
    #[serde(default = "default_reviews")]
    pub reviews: RateLimitPolicy,
    /// Minimum time between lazy sweeps of stale entries
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// How long a closed window is kept before it may be swept
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
}

fn default_waitlist() -> RateLimitPolicy {
    RateLimitPolicy::new(WAITLIST_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS)
}

fn default_feedback() -> RateLimitPolicy {
    RateLimitPolicy::new(FEEDBACK_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS)
}

fn default_reviews() -> RateLimitPolicy {
    RateLimitPolicy::new(REVIEWS_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECS)
}

fn default_sweep_interval_secs() -> u64 {
    RATE_LIMIT_SWEEP_INTERVAL_SECS
}

fn default_grace_secs() -> u64 {
    RATE_LIMIT_GRACE_SECS
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            waitlist: default_waitlist(),
            feedback: default_feedback(),
            reviews: default_reviews(),
            sweep_interval_secs: default_sweep_interval_secs(),
            grace_secs: default_grace_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn policy(&self, endpoint: Endpoint) -> RateLimitPolicy {
        match endpoint {
            Endpoint::Waitlist => self.waitlist,
            Endpoint::Feedback => self.feedback,
            Endpoint::Reviews => self.reviews,
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window closes
    pub reset_after: Duration,
    /// Wall-clock end of the current window
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    fn new(allowed: bool, limit: u32, remaining: u32, reset_after: Duration) -> Self {
        let now = Utc::now();
        let reset_at = chrono::Duration::from_std(reset_after)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            allowed,
            limit,
            remaining,
            reset_after,
            reset_at,
        }
    }

    /// Whole seconds until retrying can succeed, never zero.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        let rounded = if self.reset_after.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        };
        rounded.max(1)
    }
}

struct RateLimitEntry {
    count: u32,
    window_end: Instant,
}

impl RateLimitEntry {
    fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            window_end: saturating_add(now, window),
        }
    }
}

/// `at + by`, clamped to the latest representable instant. Windows and grace
/// periods come from configuration and may be arbitrarily large.
fn saturating_add(at: Instant, mut by: Duration) -> Instant {
    loop {
        if let Some(later) = at.checked_add(by) {
            return later;
        }
        by /= 2;
    }
}

struct Inner {
    entries: HashMap<String, RateLimitEntry>,
    last_sweep: Instant,
}

/// Fixed-window rate limiter.
///
/// All state sits behind one mutex, so check-and-increment is atomic for
/// every key even on a multi-threaded runtime.
pub struct RateLimiter {
    inner: Mutex<Inner>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check the endpoint's quota for a caller. Keys are scoped per
    /// endpoint so quotas never share a bucket.
    pub fn check_endpoint(&self, endpoint: Endpoint, identity: &ClientIdentity) -> RateLimitDecision {
        let policy = self.config.policy(endpoint);

        if !identity.is_resolved() {
            debug!(scope = endpoint.scope(), %identity, "Rejecting unresolved identity");
            return RateLimitDecision::new(false, policy.max_requests, 0, policy.window());
        }

        let key = format!("{}:{}", endpoint.scope(), identity);
        self.check(&key, policy.max_requests, policy.window())
    }

    /// Count one request for `identity` against a fixed window.
    ///
    /// Empty or sentinel identities are denied without touching the map.
    pub fn check(&self, identity: &str, max_requests: u32, window: Duration) -> RateLimitDecision {
        self.check_at(identity, max_requests, window, Instant::now())
    }

    fn check_at(
        &self,
        identity: &str,
        max_requests: u32,
        window: Duration,
        now: Instant,
    ) -> RateLimitDecision {
        let scoped_identity = identity.split_once(':').map_or(identity, |(_, id)| id);
        if ClientIdentity::is_sentinel(identity) || ClientIdentity::is_sentinel(scoped_identity) {
            return RateLimitDecision::new(false, max_requests, 0, window);
        }

        if max_requests == 0 {
            return RateLimitDecision::new(false, 0, 0, window);
        }

        let mut inner = self.inner.lock();
        self.maybe_sweep(&mut inner, now);

        if let Some(entry) = inner.entries.get_mut(identity) {
            if now <= entry.window_end {
                let reset_after = entry.window_end.saturating_duration_since(now);

                if entry.count >= max_requests {
                    return RateLimitDecision::new(false, max_requests, 0, reset_after);
                }

                entry.count += 1;
                return RateLimitDecision::new(
                    true,
                    max_requests,
                    max_requests - entry.count,
                    reset_after,
                );
            }
        }

        inner
            .entries
            .insert(identity.to_string(), RateLimitEntry::open(now, window));

        RateLimitDecision::new(true, max_requests, max_requests - 1, window)
    }

    /// Sweep at most once per sweep interval. The scan runs under the lock
    /// the caller already holds.
    fn maybe_sweep(&self, inner: &mut Inner, now: Instant) {
        let interval = Duration::from_secs(self.config.sweep_interval_secs);
        if now.saturating_duration_since(inner.last_sweep) < interval {
            return;
        }
        self.sweep(inner, now);
    }

    fn sweep(&self, inner: &mut Inner, now: Instant) -> usize {
        let grace = Duration::from_secs(self.config.grace_secs);
        let before = inner.entries.len();

        inner
            .entries
            .retain(|_, entry| now <= saturating_add(entry.window_end, grace));
        inner.last_sweep = now;

        let removed = before - inner.entries.len();
        if removed > 0 {
            debug!(removed, remaining = inner.entries.len(), "Swept stale rate limit entries");
        }
        removed
    }

    /// Remove entries whose window closed more than the grace period ago.
    /// Returns the number removed.
    pub fn cleanup_stale(&self) -> usize {
        let mut inner = self.inner.lock();
        self.sweep(&mut inner, Instant::now())
    }

    /// Number of tracked keys.
    pub fn tracked_keys(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<RateLimiter>;
