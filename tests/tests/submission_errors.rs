//! Tests for error handling in the submission pipeline.
//!
//! These tests verify that the API returns correct status codes and error
//! codes for each failure, and that rejected input never reaches the store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use integration_tests::{fixtures, setup::TestContext};
use tower::ServiceExt;

/// Test invalid JSON returns VALID_001
#[tokio::test]
async fn test_invalid_json_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .content_type("application/json")
        .add_header("X-Forwarded-For", fixtures::client_ip(10))
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

/// Test a JSON array body returns VALID_001
#[tokio::test]
async fn test_wrong_shape_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(11))
        .json(&serde_json::json!(["ideas"]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

/// Test non-JSON content type is rejected before the handler
#[tokio::test]
async fn test_wrong_content_type_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(12))
        .text("email=a@b.com")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid content type");
    assert_eq!(ctx.store.store_calls(), 0);
}

/// Test missing email returns VALID_002
#[tokio::test]
async fn test_missing_email_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(13))
        .json(&serde_json::json!({ "name": "Ada" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");
}

/// Test malformed email returns VALID_003
#[tokio::test]
async fn test_invalid_email_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for email in ["a@b", "a..b@c.com", ".a@b.com"] {
        let response = server
            .post("/api/waitlist")
            .add_header("X-Forwarded-For", fixtures::client_ip(14))
            .json(&fixtures::waitlist_payload(email))
            .await;

        // The third attempt is still inside the waitlist quota.
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "VALID_003", "email {:?}", email);
    }
    assert_eq!(ctx.store.store_calls(), 0);
}

/// Test a name with digits returns VALID_004
#[tokio::test]
async fn test_invalid_name_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(15))
        .json(&serde_json::json!({ "email": "ok@example.com", "name": "R2D2" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_004");
}

/// Test feedback with every text field blank fails before any store call
#[tokio::test]
async fn test_empty_feedback_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(16))
        .json(&serde_json::json!({
            "name": "Grace",
            "ideas": "",
            "views": "   ",
            "suggestions": null
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");
    assert_eq!(ctx.store.schema_calls(), 0);
    assert_eq!(ctx.store.store_calls(), 0);
}

/// Test a review with only a suggestion is rejected
#[tokio::test]
async fn test_review_needs_review_or_opinion() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/reviews")
        .add_header("X-Forwarded-For", fixtures::client_ip(17))
        .json(&serde_json::json!({ "suggestion": "Add dark mode" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.store.reviews().is_empty());
}

/// Test optional email on feedback must still be valid
#[tokio::test]
async fn test_feedback_bad_optional_email() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(18))
        .json(&serde_json::json!({ "email": "nope", "ideas": "More" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_003");
}

/// Test oversized body returns 413
#[tokio::test]
async fn test_oversized_body_returns_413() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let payload = serde_json::json!({ "ideas": "x".repeat(12 * 1024) });

    let response = server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(19))
        .json(&payload)
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_005");
    assert_eq!(body["error"], "Payload too large");
    assert!(ctx.store.feedback().is_empty());
}

/// Test a declared oversized Content-Length gets the JSON 413 before the body is read
#[tokio::test]
async fn test_declared_oversize_returns_json_413() {
    let ctx = TestContext::new();
    let payload = vec![b' '; 11 * 1024];

    let request = Request::builder()
        .method("POST")
        .uri("/api/waitlist")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .header("X-Forwarded-For", fixtures::client_ip(22))
        .body(Body::from(payload))
        .unwrap();

    let response = ctx.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "VALID_005");
    assert_eq!(ctx.store.store_calls(), 0);
}

/// Test an email carrying markup or handler text is refused, not stored
#[tokio::test]
async fn test_email_with_markup_returns_400() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(23))
        .json(&serde_json::json!({ "email": "o'neil&onclick=x@example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_003");
    assert!(ctx.store.waitlist().is_empty());

    let response = server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(23))
        .json(&serde_json::json!({ "email": "a&b@example.com", "ideas": "More" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.store.feedback().is_empty());
}

/// Test GET on a submission route is 405
#[tokio::test]
async fn test_wrong_method_returns_405() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .get("/api/waitlist")
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

/// Test schema failure returns DB_001 with 503
#[tokio::test]
async fn test_schema_failure_returns_503() {
    let ctx = TestContext::new();
    ctx.store.set_fail_schema(true);
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", fixtures::client_ip(20))
        .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "DB_001");
    assert_eq!(body["error"], "Database setup failed");
    assert!(ctx.store.waitlist().is_empty());
}

/// Test store failure returns DB_002 without leaking driver text
#[tokio::test]
async fn test_store_failure_returns_500() {
    let ctx = TestContext::new();
    ctx.store.set_fail_writes(true);
    let server = ctx.server();

    let response = server
        .post("/api/reviews")
        .add_header("X-Forwarded-For", fixtures::client_ip(21))
        .json(&fixtures::review_payload())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "DB_002");
    assert!(!body["error"].as_str().unwrap().contains("connection reset"));
}

/// Test failed health probe returns 503 with status "error"
#[tokio::test]
async fn test_health_failure_returns_503() {
    let ctx = TestContext::new();
    ctx.store.set_fail_health(true);
    let server = ctx.server();

    let response = server.get("/api/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["database"], false);
    assert!(body.get("tables").is_none());
}

/// Test an unexpected store failure returns INTERNAL_001 with a generic message
#[tokio::test]
async fn test_unexpected_failure_returns_internal() {
    let ctx = TestContext::new();
    ctx.store.set_garbled_rows(true);
    let server = ctx.server();

    let response = server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(24))
        .json(&fixtures::feedback_payload())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INTERNAL_001");
    assert_eq!(body["error"], "Internal server error");
    assert!(ctx.store.feedback().is_empty());
}
