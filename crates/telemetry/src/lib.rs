//! Process-local telemetry for the landing service.
//!
//! Logs go through `tracing`; counters and component health are kept in
//! memory and surfaced by the health endpoints.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
