//! Waitlist signup endpoint.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::Response,
};
use brutal_core::{
    Endpoint, Redirect, WaitlistOutcome, WaitlistRequest, WAITLIST_ALREADY_MESSAGE,
    WAITLIST_JOINED_MESSAGE,
};
use store::SubmissionStore;
use telemetry::metrics;
use tracing::info;

use crate::extractors::{CallerIdentity, UserAgent};
use crate::response::{ApiError, SubmissionResponse};
use crate::routes::common::SubmissionContext;
use crate::state::AppState;

/// POST /api/waitlist
///
/// Idempotent per email: a repeat signup (any letter case) answers 200
/// with the "already joined" redirect and writes nothing.
pub async fn waitlist_handler(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    UserAgent(user_agent): UserAgent,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let ctx = SubmissionContext::admit(&state, Endpoint::Waitlist, identity, user_agent)?;

    let request: WaitlistRequest = ctx.parse(body)?;
    let entry = request
        .into_entry(identity.ip())
        .map_err(|e| ctx.reject(e))?;

    ctx.ensure_schema(&state).await?;

    let already = SubmissionResponse::new(WAITLIST_ALREADY_MESSAGE, Redirect::AlreadyJoined);

    let existing = state
        .store
        .find_waitlist_email(&entry.email)
        .await
        .map_err(|e| ctx.fail(e))?;
    if existing.is_some() {
        metrics().waitlist_duplicates.inc();
        info!(identity = %identity, "Waitlist email already present");
        return Ok(ctx.respond(StatusCode::OK, already));
    }

    match state
        .store
        .insert_waitlist(&entry)
        .await
        .map_err(|e| ctx.fail(e))?
    {
        WaitlistOutcome::Joined(id) => {
            metrics().submissions_accepted.inc();
            info!(%id, identity = %identity, "Waitlist signup stored");
            Ok(ctx.respond(
                StatusCode::CREATED,
                SubmissionResponse::new(WAITLIST_JOINED_MESSAGE, Redirect::Thanks),
            ))
        }
        // Lost a race with a concurrent signup for the same email.
        WaitlistOutcome::AlreadyJoined => {
            metrics().waitlist_duplicates.inc();
            Ok(ctx.respond(StatusCode::OK, already))
        }
    }
}
