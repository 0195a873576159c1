//! Submission inserts and the waitlist duplicate lookup.

use crate::client::PgClient;
use brutal_core::{
    Error, NewFeedbackEntry, NewReviewEntry, NewWaitlistEntry, Result, WaitlistOutcome,
};
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, error};
use uuid::Uuid;

/// Find an existing waitlist row by email, ignoring case.
pub async fn find_waitlist_email(client: &PgClient, email: &str) -> Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM waitlist WHERE lower(email) = lower($1) LIMIT 1")
        .bind(email)
        .fetch_optional(client.pool())
        .await
        .map_err(|e| query_error("waitlist lookup", e))
}

/// Insert a waitlist row.
///
/// A concurrent insert of the same email loses the race on the unique
/// index and reports [`WaitlistOutcome::AlreadyJoined`] instead of failing.
pub async fn insert_waitlist(client: &PgClient, entry: &NewWaitlistEntry) -> Result<WaitlistOutcome> {
    let start = Instant::now();

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO waitlist (email, name, ip_address, created_at, updated_at)
        VALUES ($1, $2, $3::inet, NOW(), NOW())
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&entry.email)
    .bind(entry.name.as_deref())
    .bind(entry.ip_address.map(|ip| ip.to_string()))
    .fetch_optional(client.pool())
    .await
    .map_err(|e| query_error("waitlist insert", e))?;

    record_latency(start);

    Ok(match id {
        Some(id) => {
            debug!(%id, "Inserted waitlist entry");
            WaitlistOutcome::Joined(id)
        }
        None => WaitlistOutcome::AlreadyJoined,
    })
}

pub async fn insert_feedback(client: &PgClient, entry: &NewFeedbackEntry) -> Result<Uuid> {
    let start = Instant::now();

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO feedback (name, email, ideas, views, suggestions, wants, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING id
        "#,
    )
    .bind(entry.name.as_deref())
    .bind(entry.email.as_deref())
    .bind(entry.ideas.as_deref())
    .bind(entry.views.as_deref())
    .bind(entry.suggestions.as_deref())
    .bind(entry.wants.as_deref())
    .fetch_one(client.pool())
    .await
    .map_err(|e| query_error("feedback insert", e))?;

    record_latency(start);
    debug!(%id, "Inserted feedback entry");
    Ok(id)
}

pub async fn insert_review(client: &PgClient, entry: &NewReviewEntry) -> Result<Uuid> {
    let start = Instant::now();

    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO reviews (name, email, review, idea_opinion, suggestion, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING id
        "#,
    )
    .bind(entry.name.as_deref())
    .bind(entry.email.as_deref())
    .bind(entry.review.as_deref())
    .bind(entry.idea_opinion.as_deref())
    .bind(entry.suggestion.as_deref())
    .fetch_one(client.pool())
    .await
    .map_err(|e| query_error("review insert", e))?;

    record_latency(start);
    debug!(%id, "Inserted review entry");
    Ok(id)
}

fn query_error(op: &str, e: sqlx::Error) -> Error {
    metrics().store_errors.inc();
    error!(operation = op, error = %e, "Postgres query failed");
    classify(op, e)
}

/// A row that does not decode means the code and the table disagree, which
/// no retry by the caller fixes. Everything else is a failed write.
fn classify(op: &str, e: sqlx::Error) -> Error {
    match e {
        sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => {
            Error::internal(format!("{} returned an unexpected row: {}", op, e))
        }
        other => Error::query(format!("{} failed: {}", op, other)),
    }
}

fn record_latency(start: Instant) {
    metrics().store_inserts.inc();
    metrics()
        .store_latency_ms
        .observe(start.elapsed().as_millis() as u64);
}
