//! Postgres configuration.

use brutal_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Postgres connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string (`postgres://` or `postgresql://`). Required.
    #[serde(default)]
    pub url: String,
    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Reject a missing or non-Postgres connection string.
    pub fn validate(&self) -> Result<()> {
        let raw = self.url.trim();
        if raw.is_empty() {
            return Err(Error::config("database url is not configured"));
        }

        let parsed = url::Url::parse(raw)
            .map_err(|e| Error::config(format!("database url is malformed: {}", e)))?;

        match parsed.scheme() {
            "postgres" | "postgresql" => {}
            other => {
                return Err(Error::config(format!(
                    "database url must use postgres:// or postgresql://, got {}://",
                    other
                )))
            }
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(Error::config("database url has no host"));
        }

        if self.max_connections == 0 {
            return Err(Error::config("max_connections must be at least 1"));
        }

        Ok(())
    }

    /// Host and database name only, safe for logs.
    pub fn redacted(&self) -> String {
        match url::Url::parse(self.url.trim()) {
            Ok(parsed) => format!(
                "{}://{}{}",
                parsed.scheme(),
                parsed.host_str().unwrap_or_default(),
                parsed.path()
            ),
            Err(_) => "<invalid>".to_string(),
        }
    }
}
