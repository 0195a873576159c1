//! Happy-path submissions through the real router.
//!
//! Uses MockStore in place of Postgres, so no Docker is needed.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use std::net::{IpAddr, Ipv4Addr};

/// New waitlist signup returns 201 with the thanks redirect
#[tokio::test]
async fn test_waitlist_signup_created() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(1))
        .json(&serde_json::json!({ "email": "New.User@Example.com", "name": "Ada" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "You're in.");
    assert_eq!(body["redirect"], "/thanks");

    let rows = ctx.store.waitlist();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "new.user@example.com");
    assert_eq!(rows[0].name.as_deref(), Some("Ada"));
    assert_eq!(
        rows[0].ip_address,
        Some(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 1)))
    );
}

/// Success responses carry the caller's quota
#[tokio::test]
async fn test_success_carries_rate_limit_headers() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(2))
        .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.header("X-RateLimit-Limit"), "3");
    assert_eq!(response.header("X-RateLimit-Remaining"), "2");
    assert!(response.maybe_header("X-RateLimit-Reset").is_some());
}

/// A repeat signup with different letter case is "already joined" and
/// writes nothing
#[tokio::test]
async fn test_duplicate_email_any_case() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(3))
        .json(&fixtures::waitlist_payload("dup@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(3))
        .json(&fixtures::waitlist_payload("DUP@Example.COM"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "You're already part of this.");
    assert_eq!(body["redirect"], "/already");
    assert_eq!(ctx.store.waitlist().len(), 1);
}

/// Waitlist name is optional
#[tokio::test]
async fn test_waitlist_without_name() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(4))
        .json(&serde_json::json!({ "email": "solo@example.com" }))
        .await
        .assert_status(StatusCode::CREATED);

    assert!(ctx.store.waitlist()[0].name.is_none());
}

/// Feedback returns 201 with the noted redirect
#[tokio::test]
async fn test_feedback_created() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(5))
        .json(&fixtures::feedback_payload())
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "We've got your input. Raw and real.");
    assert_eq!(body["redirect"], "/noted");

    let rows = ctx.store.feedback();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ideas.as_deref(), Some("Make it even harsher"));
    assert!(rows[0].views.is_none());
}

/// Markup and script URLs are stripped before storage
#[tokio::test]
async fn test_feedback_is_sanitized() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(6))
        .json(&serde_json::json!({
            "name": "<b>Mallory</b>",
            "views": "<script>alert('x')</script> javascript:void(0)"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let row = &ctx.store.feedback()[0];
    let views = row.views.as_deref().unwrap();
    for forbidden in ["<", ">", "'", "\"", "javascript:"] {
        assert!(!views.contains(forbidden), "{:?} left in {:?}", forbidden, views);
    }
    assert!(!row.name.as_deref().unwrap().contains('<'));
}

/// Review returns 201 with the noted redirect
#[tokio::test]
async fn test_review_created() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/reviews")
        .add_header("X-Forwarded-For", fixtures::client_ip(7))
        .json(&fixtures::review_payload())
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Your review is locked in.");
    assert_eq!(body["redirect"], "/noted");

    let rows = ctx.store.reviews();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].suggestion.as_deref(), Some("Ship a CLI"));
}

/// X-Real-IP is used when X-Forwarded-For is absent
#[tokio::test]
async fn test_real_ip_header_identifies_caller() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/waitlist")
        .add_header("X-Real-IP", "::ffff:198.51.100.20")
        .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(
        ctx.store.waitlist()[0].ip_address,
        Some(IpAddr::V4(Ipv4Addr::new(198, 51, 100, 20)))
    );
}

/// Every submission runs the schema check first
#[tokio::test]
async fn test_schema_is_ensured_before_insert() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/reviews")
        .add_header("X-Forwarded-For", fixtures::client_ip(8))
        .json(&fixtures::review_payload())
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(ctx.store.schema_calls(), 1);
}

/// Health row counts reflect stored submissions
#[tokio::test]
async fn test_health_counts_rows() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", "192.0.2.50")
        .json(&fixtures::feedback_payload())
        .await
        .assert_status(StatusCode::CREATED);

    let body: serde_json::Value = server.get("/api/health").await.json();
    assert_eq!(body["tables"]["feedback"]["total_entries"], 1);
    assert_eq!(body["tables"]["waitlist"]["total_entries"], 0);
}
