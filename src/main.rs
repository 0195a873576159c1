//! BRUTAL landing service
//!
//! Serves the landing pages and accepts three kinds of form submission:
//! - Waitlist signups, idempotent per email
//! - Free-form feedback
//! - Reviews of the idea
//!
//! Every submission is rate limited per client address and persisted to
//! Postgres.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AppState, RateLimitConfig};
use brutal_core::limits::REQUEST_TIMEOUT_SECS;
use store::{DatabaseConfig, PgClient, SubmissionStore};
use telemetry::{health, init_tracing, LoggingConfig};

/// Environment variables checked, in order, for the connection string.
const DATABASE_URL_VARS: [&str; 3] = ["BRUTAL_DATABASE_URL", "DATABASE_URL", "POSTGRES_URL_NON_POOLING"];

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Upper bound on any single request
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    #[serde(default)]
    database: DatabaseConfig,

    #[serde(default)]
    rate_limit: RateLimitConfig,

    #[serde(default)]
    logging: LoggingConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            database: DatabaseConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let mut config = load_config()?;

    init_tracing(&config.logging.clone().with_env_overrides());

    apply_port_override(&mut config, std::env::var("PORT").ok());

    info!("Starting BRUTAL landing service v{}", env!("CARGO_PKG_VERSION"));

    // A missing or malformed connection string is fatal.
    config
        .database
        .validate()
        .context("Invalid database configuration")?;

    let store = Arc::new(PgClient::new(config.database.clone()).context("Failed to create Postgres pool")?);

    check_health(&store).await;

    // Run the migration once up front. On failure the service still starts
    // and the first submission retries it.
    match store.ensure_schema().await {
        Ok(()) => {
            health().schema.set_healthy();
            info!("Schema ready");
        }
        Err(e) => {
            health().schema.set_unhealthy(e.to_string());
            error!("Failed to initialize schema: {}", e);
        }
    }

    let state = AppState::with_rate_limit(store.clone(), config.rate_limit.clone())
        .with_request_timeout(Duration::from_secs(config.request_timeout_secs));

    let _rate_limiter_cleanup = state.start_rate_limiter_cleanup();
    info!(
        interval_secs = config.rate_limit.sweep_interval_secs,
        "Started rate limiter cleanup task"
    );

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Connect info supplies the peer address when no forwarding header is set.
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    store.close().await;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("BRUTAL")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Hosting platforms inject the connection string under their own names.
    if let Some(url) = DATABASE_URL_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
    {
        config.database.url = url;
    }

    Ok(config)
}

/// Apply the platform-injected `PORT`. Runs after tracing is installed so an
/// unparsable value is reported.
fn apply_port_override(config: &mut Config, raw: Option<String>) {
    let Some(raw) = raw else {
        return;
    };
    match raw.trim().parse() {
        Ok(port) => config.port = port,
        Err(_) => warn!(port = %raw, "Ignoring unparsable PORT"),
    }
}

/// Check database reachability on startup.
async fn check_health(store: &PgClient) {
    if store::health::check_connection(store).await {
        health().database.set_healthy();
        info!(database = %store.config().redacted(), "Postgres connection: healthy");
    } else {
        health().database.set_unhealthy("Connection failed");
        error!(database = %store.config().redacted(), "Postgres connection: unhealthy");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
