//! Size and rate limits for the landing service.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so the raw payload caps are duplicated in `submission.rs`. Keep both in
//! sync when modifying.

// === Request Limits ===

/// Maximum API request body in bytes (10KB).
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024;

/// Maximum raw length of any single free-text field before sanitization.
///
/// Anything larger cannot fit inside the body limit anyway.
pub const MAX_RAW_FIELD_LEN: usize = 10 * 1024;

// === String Field Limits (chars) ===

/// Minimum email length (`a@b.c`).
pub const MIN_EMAIL_LEN: usize = 5;

/// Maximum email length (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum display name length.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum free-text length after sanitization.
pub const MAX_TEXT_LEN: usize = 1000;

// === Rate Limits ===

/// Waitlist signups per identity per window.
pub const WAITLIST_MAX_REQUESTS: u32 = 3;

/// Feedback submissions per identity per window.
pub const FEEDBACK_MAX_REQUESTS: u32 = 5;

/// Review submissions per identity per window.
pub const REVIEWS_MAX_REQUESTS: u32 = 5;

/// Fixed window length in seconds.
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// How often stale rate-limit entries are swept (10 minutes).
pub const RATE_LIMIT_SWEEP_INTERVAL_SECS: u64 = 600;

/// How long after its window closes an entry is kept before sweeping.
pub const RATE_LIMIT_GRACE_SECS: u64 = 60;

// === Timeouts ===

/// Request timeout applied to every route.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
