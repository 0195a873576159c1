//! Postgres health checks.

use crate::client::PgClient;
use crate::query::{count_rows, server_info, table_columns, ColumnInfo};
use brutal_core::{Endpoint, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Presence and size of one submission table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStatus {
    pub exists: bool,
    pub columns: Vec<ColumnInfo>,
    pub total_entries: i64,
}

/// Snapshot reported by `/api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHealth {
    pub db_time: DateTime<Utc>,
    pub db_version: String,
    pub tables: BTreeMap<String, TableStatus>,
}

impl StoreHealth {
    /// Whether every submission table exists.
    pub fn schema_present(&self) -> bool {
        Endpoint::ALL
            .iter()
            .all(|e| self.tables.get(e.table()).is_some_and(|t| t.exists))
    }
}

/// Check Postgres connection health.
pub async fn check_connection(client: &PgClient) -> bool {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(client.pool()).await {
        Ok(_) => {
            debug!("Postgres connection healthy");
            true
        }
        Err(e) => {
            error!("Postgres health check failed: {}", e);
            false
        }
    }
}

/// Collect reachability, schema and row counts.
pub async fn collect(client: &PgClient) -> Result<StoreHealth> {
    let (db_time, db_version) = server_info(client).await?;

    let mut tables = BTreeMap::new();
    for endpoint in Endpoint::ALL {
        let columns = table_columns(client, endpoint).await?;
        let exists = !columns.is_empty();
        let total_entries = if exists {
            count_rows(client, endpoint).await?
        } else {
            0
        };

        tables.insert(
            endpoint.table().to_string(),
            TableStatus {
                exists,
                columns,
                total_entries,
            },
        );
    }

    Ok(StoreHealth {
        db_time,
        db_version,
        tables,
    })
}
