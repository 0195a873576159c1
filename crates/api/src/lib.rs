//! HTTP layer for the BRUTAL landing service.

pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use middleware::rate_limit::{RateLimitConfig, RateLimitPolicy, RateLimiter};
pub use routes::router;
pub use state::AppState;
