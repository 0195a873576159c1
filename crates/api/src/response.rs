//! Standardized API responses.

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use brutal_core::{DbErrorCode, Redirect, ValidationErrorCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use store::TableStatus;
use telemetry::MetricsSnapshot;

use crate::middleware::rate_limit::RateLimitDecision;

/// Success body for the submission endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl SubmissionResponse {
    pub fn new(message: impl Into<String>, redirect: Redirect) -> Self {
        Self {
            message: message.into(),
            redirect: Some(redirect.path().to_string()),
        }
    }

    /// Attach the caller's quota headers and serialize.
    pub fn into_response_with(self, status: StatusCode, quota: &RateLimitDecision) -> Response {
        let mut response = (status, Json(self)).into_response();
        apply_rate_limit_headers(response.headers_mut(), quota);
        response
    }
}

/// `/api/health` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<BTreeMap<String, TableStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// API error type carrying the wire error code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
    pub quota: Option<RateLimitDecision>,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
            quota: None,
        }
    }

    pub fn validation(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
        Self::with_code(status, code.code(), msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::validation(ValidationErrorCode::InvalidFormat, msg)
    }

    /// 429 carrying `Retry-After` and the quota headers.
    pub fn rate_limited(decision: RateLimitDecision) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            response: ErrorResponse::new("Too many requests. Try again later.", "RATE_001"),
            quota: Some(decision),
        }
    }

    pub fn schema_unavailable() -> Self {
        Self::with_code(
            StatusCode::SERVICE_UNAVAILABLE,
            DbErrorCode::SchemaSetup.code(),
            "Database setup failed",
        )
    }

    pub fn internal() -> Self {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_001",
            "Internal server error",
        )
    }

    /// Attach quota headers to a non-429 error.
    pub fn with_quota(mut self, decision: &RateLimitDecision) -> Self {
        self.quota = Some(*decision);
        self
    }

    pub fn code(&self) -> &str {
        &self.response.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        if let Some(quota) = &self.quota {
            apply_rate_limit_headers(response.headers_mut(), quota);
            if !quota.allowed {
                response
                    .headers_mut()
                    .insert("Retry-After", HeaderValue::from(quota.retry_after_secs()));
            }
        }

        response
    }
}

impl From<brutal_core::Error> for ApiError {
    fn from(err: brutal_core::Error) -> Self {
        match &err {
            brutal_core::Error::Validation { code, message, http_status } => {
                let status =
                    StatusCode::from_u16(*http_status).unwrap_or(StatusCode::BAD_REQUEST);
                ApiError::with_code(status, *code, message)
            }
            brutal_core::Error::Serialization(e) => ApiError::bad_request(e.to_string()),
            brutal_core::Error::Database { code, .. }
                if *code == DbErrorCode::SchemaSetup.code() =>
            {
                ApiError::schema_unavailable()
            }
            brutal_core::Error::Config(_) => ApiError::schema_unavailable(),
            brutal_core::Error::Database { code, http_status, .. } => {
                // Never echo driver text back to the caller.
                let status = StatusCode::from_u16(*http_status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                ApiError::with_code(status, *code, "Failed to save submission")
            }
            brutal_core::Error::RateLimit { code, message, .. } => {
                ApiError::with_code(StatusCode::TOO_MANY_REQUESTS, *code, message)
            }
            brutal_core::Error::Internal(_) => ApiError::internal(),
        }
    }
}

/// Writes `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
/// `X-RateLimit-Reset` (unix seconds).
pub fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "X-RateLimit-Reset",
        HeaderValue::from(decision.reset_at.timestamp()),
    );
}
