//! Request middleware.

pub mod rate_limit;
pub mod security;

pub use rate_limit::{RateLimitConfig, RateLimitDecision, RateLimitPolicy, RateLimiter, SharedRateLimiter};
pub use security::{require_json, security_headers};
