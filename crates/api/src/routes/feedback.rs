//! Feedback endpoint.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::Response,
};
use brutal_core::{Endpoint, FeedbackRequest, Redirect, FEEDBACK_MESSAGE};
use store::SubmissionStore;
use telemetry::metrics;
use tracing::info;

use crate::extractors::{CallerIdentity, UserAgent};
use crate::response::{ApiError, SubmissionResponse};
use crate::routes::common::SubmissionContext;
use crate::state::AppState;

/// POST /api/feedback
pub async fn feedback_handler(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    UserAgent(user_agent): UserAgent,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let ctx = SubmissionContext::admit(&state, Endpoint::Feedback, identity, user_agent)?;

    let request: FeedbackRequest = ctx.parse(body)?;
    let entry = request.into_entry().map_err(|e| ctx.reject(e))?;

    ctx.ensure_schema(&state).await?;

    let id = state
        .store
        .insert_feedback(&entry)
        .await
        .map_err(|e| ctx.fail(e))?;

    metrics().submissions_accepted.inc();
    info!(%id, identity = %identity, "Feedback stored");

    Ok(ctx.respond(
        StatusCode::CREATED,
        SubmissionResponse::new(FEEDBACK_MESSAGE, Redirect::Noted),
    ))
}
