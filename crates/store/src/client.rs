//! Postgres client wrapper and the store seam used by the API.

use crate::config::DatabaseConfig;
use crate::health::StoreHealth;
use async_trait::async_trait;
use brutal_core::{NewFeedbackEntry, NewReviewEntry, NewWaitlistEntry, Result, WaitlistOutcome};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

/// Persistence operations needed by the submission handlers.
///
/// Implemented by [`PgClient`] in production and by an in-memory mock in
/// the integration tests.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Make sure every table and column exists. Runs the migration at most
    /// once per process; later calls return the cached outcome.
    async fn ensure_schema(&self) -> Result<()>;

    /// Look up a waitlist row by (already lower-cased) email.
    async fn find_waitlist_email(&self, email: &str) -> Result<Option<Uuid>>;

    /// Insert a waitlist row unless the email is already present.
    async fn insert_waitlist(&self, entry: &NewWaitlistEntry) -> Result<WaitlistOutcome>;

    async fn insert_feedback(&self, entry: &NewFeedbackEntry) -> Result<Uuid>;

    async fn insert_review(&self, entry: &NewReviewEntry) -> Result<Uuid>;

    /// Reachability, schema presence and row counts.
    async fn health(&self) -> Result<StoreHealth>;
}

/// Postgres client with connection pooling.
pub struct PgClient {
    pool: PgPool,
    config: DatabaseConfig,
    schema: OnceCell<()>,
}

impl PgClient {
    /// Creates a new client. Connections are opened lazily, so this only
    /// fails for an invalid configuration.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy(config.url.trim())
            .map_err(|e| brutal_core::Error::config(format!("Invalid database url: {}", e)))?;

        info!(
            database = %config.redacted(),
            max_connections = config.max_connections,
            "Created Postgres pool"
        );

        Ok(Self {
            pool,
            config,
            schema: OnceCell::new(),
        })
    }

    /// Returns the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Whether the migration has completed in this process.
    pub fn schema_ready(&self) -> bool {
        self.schema.initialized()
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SubmissionStore for PgClient {
    async fn ensure_schema(&self) -> Result<()> {
        // Concurrent first callers wait on the same initialization; a failed
        // attempt leaves the cell empty so the next request tries again.
        self.schema
            .get_or_try_init(|| async {
                crate::schema::init_schema(self).await.map_err(|e| {
                    warn!(error = %e, "Schema migration failed");
                    e
                })
            })
            .await
            .map(|_| ())
    }

    async fn find_waitlist_email(&self, email: &str) -> Result<Option<Uuid>> {
        crate::insert::find_waitlist_email(self, email).await
    }

    async fn insert_waitlist(&self, entry: &NewWaitlistEntry) -> Result<WaitlistOutcome> {
        crate::insert::insert_waitlist(self, entry).await
    }

    async fn insert_feedback(&self, entry: &NewFeedbackEntry) -> Result<Uuid> {
        crate::insert::insert_feedback(self, entry).await
    }

    async fn insert_review(&self, entry: &NewReviewEntry) -> Result<Uuid> {
        crate::insert::insert_review(self, entry).await
    }

    async fn health(&self) -> Result<StoreHealth> {
        crate::health::collect(self).await
    }
}
