//! Postgres persistence for the BRUTAL landing service.

pub mod client;
pub mod config;
pub mod health;
pub mod insert;
pub mod query;
pub mod schema;

pub use client::*;
pub use config::*;
pub use health::{StoreHealth, TableStatus};
pub use query::*;
