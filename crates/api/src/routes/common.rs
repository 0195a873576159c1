//! Protocol shared by the three submission endpoints.

use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::Response,
};
use brutal_core::{ClientIdentity, Endpoint, ValidationErrorCode};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::time::Instant;
use store::SubmissionStore;
use telemetry::{health, metrics};
use tracing::{error, warn};

use crate::middleware::rate_limit::RateLimitDecision;
use crate::response::{ApiError, SubmissionResponse};
use crate::state::AppState;

/// One admitted submission: the caller passed the rate limiter and the
/// remaining steps report against this context.
pub struct SubmissionContext {
    pub endpoint: Endpoint,
    pub identity: ClientIdentity,
    user_agent: Option<String>,
    quota: RateLimitDecision,
    started: Instant,
}

impl SubmissionContext {
    /// Consult the rate limiter; a denial becomes a 429 with quota headers.
    pub fn admit(
        state: &AppState,
        endpoint: Endpoint,
        identity: ClientIdentity,
        user_agent: Option<String>,
    ) -> Result<Self, ApiError> {
        metrics().submissions_received.inc();

        let quota = state.rate_limiter.check_endpoint(endpoint, &identity);
        if !quota.allowed {
            metrics().rate_limited_requests.inc();
            warn!(
                endpoint = endpoint.scope(),
                identity = %identity,
                retry_after = quota.retry_after_secs(),
                "Rate limit exceeded"
            );
            return Err(ApiError::rate_limited(quota));
        }

        Ok(Self {
            endpoint,
            identity,
            user_agent,
            quota,
            started: Instant::now(),
        })
    }

    /// Buffer and deserialize the JSON body. A body over the size cap is a
    /// 413; anything else that is not a JSON object of the expected shape
    /// is a 400.
    pub fn parse<T: DeserializeOwned>(
        &self,
        body: Result<Bytes, BytesRejection>,
    ) -> Result<T, ApiError> {
        let body = body.map_err(|rejection| self.reject(body_error(&rejection)))?;
        serde_json::from_slice(&body).map_err(|e| self.reject(e.into()))
    }

    /// A caller-correctable failure.
    pub fn reject(&self, err: brutal_core::Error) -> ApiError {
        metrics().validation_failures.inc();
        warn!(
            endpoint = self.endpoint.scope(),
            identity = %self.identity,
            code = err.error_code(),
            error = %err,
            "Submission rejected"
        );
        ApiError::from(err).with_quota(&self.quota)
    }

    /// A server-side failure. Logged with caller identity, timestamp and
    /// user agent; the response carries only the generic message.
    pub fn fail(&self, err: brutal_core::Error) -> ApiError {
        if err.is_client_error() {
            return self.reject(err);
        }

        error!(
            endpoint = self.endpoint.scope(),
            identity = %self.identity,
            user_agent = self.user_agent.as_deref().unwrap_or("unknown"),
            timestamp = %Utc::now().to_rfc3339(),
            code = err.error_code(),
            error = %err,
            "Submission failed"
        );
        ApiError::from(err).with_quota(&self.quota)
    }

    /// Run the one-time migration, reporting the outcome to the health
    /// registry. Failure is fatal for this request.
    pub async fn ensure_schema(&self, state: &AppState) -> Result<(), ApiError> {
        match state.store.ensure_schema().await {
            Ok(()) => {
                health().schema.set_healthy();
                Ok(())
            }
            Err(e) => {
                metrics().schema_failures.inc();
                health().schema.set_unhealthy(e.to_string());
                Err(self.fail(brutal_core::Error::schema_setup(e.to_string())))
            }
        }
    }

    /// Build the success response with quota headers and record latency.
    pub fn respond(self, status: StatusCode, body: SubmissionResponse) -> Response {
        let latency_ms = self.started.elapsed().as_millis() as u64;
        metrics().submission_latency_ms.observe(latency_ms);
        body.into_response_with(status, &self.quota)
    }
}

/// Bodies without a declared length only hit the size cap while buffering.
fn body_error(rejection: &BytesRejection) -> brutal_core::Error {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        brutal_core::Error::validation(ValidationErrorCode::PayloadTooLarge, "Payload too large")
    } else {
        brutal_core::Error::validation(ValidationErrorCode::InvalidFormat, "Invalid request body")
    }
}
