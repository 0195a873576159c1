//! Structured logging setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: our crates at info, HTTP spans at info, sqlx quiet.
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,tower_http=info";

/// Logging configuration, loaded with the rest of the app config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    #[serde(default = "default_filter")]
    pub filter: String,
    /// One JSON object per line instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    DEFAULT_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG` and `LOG_JSON` on top of the given config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(filter) = std::env::var("RUST_LOG") {
            if !filter.trim().is_empty() {
                self.filter = filter;
            }
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            self.json = json == "1" || json.eq_ignore_ascii_case("true");
        }
        self
    }
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed (e.g. a second
/// call from tests).
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let env_filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!(filter = %config.filter, json = config.json, "Tracing initialized");
    }
    installed
}
