//! Review endpoint.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::Response,
};
use brutal_core::{Endpoint, Redirect, ReviewRequest, REVIEW_MESSAGE};
use store::SubmissionStore;
use telemetry::metrics;
use tracing::info;

use crate::extractors::{CallerIdentity, UserAgent};
use crate::response::{ApiError, SubmissionResponse};
use crate::routes::common::SubmissionContext;
use crate::state::AppState;

/// POST /api/reviews
pub async fn reviews_handler(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    UserAgent(user_agent): UserAgent,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let ctx = SubmissionContext::admit(&state, Endpoint::Reviews, identity, user_agent)?;

    let request: ReviewRequest = ctx.parse(body)?;
    let entry = request.into_entry().map_err(|e| ctx.reject(e))?;

    ctx.ensure_schema(&state).await?;

    let id = state
        .store
        .insert_review(&entry)
        .await
        .map_err(|e| ctx.fail(e))?;

    metrics().submissions_accepted.inc();
    info!(%id, identity = %identity, "Review stored");

    Ok(ctx.respond(
        StatusCode::CREATED,
        SubmissionResponse::new(REVIEW_MESSAGE, Redirect::Noted),
    ))
}
