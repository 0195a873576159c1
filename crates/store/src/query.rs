//! Read-back queries (used by the health probe and in tests).

use crate::client::PgClient;
use brutal_core::{Endpoint, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One column as reported by `information_schema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: String,
}

/// Waitlist row for verification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WaitlistRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Server clock and version string.
pub async fn server_info(client: &PgClient) -> Result<(DateTime<Utc>, String)> {
    sqlx::query_as::<_, (DateTime<Utc>, String)>("SELECT NOW(), version()")
        .fetch_one(client.pool())
        .await
        .map_err(|e| Error::query(format!("Query error: {}", e)))
}

/// Columns of a table in ordinal order; empty if the table does not exist.
pub async fn table_columns(client: &PgClient, endpoint: Endpoint) -> Result<Vec<ColumnInfo>> {
    sqlx::query_as::<_, ColumnInfo>(
        r#"
        SELECT column_name::text AS column_name,
               data_type::text AS data_type,
               is_nullable::text AS is_nullable
        FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name = $1
        ORDER BY ordinal_position
        "#,
    )
    .bind(endpoint.table())
    .fetch_all(client.pool())
    .await
    .map_err(|e| Error::query(format!("Query error: {}", e)))
}

/// Count rows in a table.
pub async fn count_rows(client: &PgClient, endpoint: Endpoint) -> Result<i64> {
    // Table names come from a closed enum, never from input.
    let sql = format!("SELECT COUNT(*) FROM {}", endpoint.table());
    sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(client.pool())
        .await
        .map_err(|e| Error::query(format!("Query error: {}", e)))
}

/// Fetch waitlist rows matching an email, ignoring case.
pub async fn waitlist_rows_for_email(client: &PgClient, email: &str) -> Result<Vec<WaitlistRow>> {
    sqlx::query_as::<_, WaitlistRow>(
        r#"
        SELECT id, email, name, host(ip_address) AS ip_address, created_at, updated_at
        FROM waitlist
        WHERE lower(email) = lower($1)
        "#,
    )
    .bind(email)
    .fetch_all(client.pool())
    .await
    .map_err(|e| Error::query(format!("Query error: {}", e)))
}

/// Truncate every submission table (test cleanup).
pub async fn truncate_all(client: &PgClient) -> Result<()> {
    sqlx::query("TRUNCATE TABLE waitlist, feedback, reviews")
        .execute(client.pool())
        .await
        .map_err(|e| Error::query(format!("Truncate error: {}", e)))?;
    Ok(())
}
