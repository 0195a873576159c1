//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use store::SubmissionStore;
use telemetry::{health, metrics};
use tracing::error;

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health - Database probe with per-table details.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.health().await {
        Ok(store_health) => {
            health().database.set_healthy();
            if store_health.schema_present() {
                health().schema.set_healthy();
            } else {
                health().schema.set_unhealthy("submission tables missing");
            }

            (
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                    database: true,
                    timestamp: Utc::now(),
                    db_time: Some(store_health.db_time),
                    db_version: Some(store_health.db_version),
                    tables: Some(store_health.tables),
                    metrics: Some(metrics().snapshot()),
                    message: None,
                }),
            )
        }
        Err(e) => {
            error!(error = %e, "Health check failed");
            health().database.set_unhealthy(e.to_string());

            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "error".to_string(),
                    database: false,
                    timestamp: Utc::now(),
                    db_time: None,
                    db_version: None,
                    tables: None,
                    metrics: None,
                    message: Some("Database connection failed".to_string()),
                }),
            )
        }
    }
}

/// GET /health/ready - Readiness probe (can accept traffic).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
