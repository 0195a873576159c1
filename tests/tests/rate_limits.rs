//! Rate limiting through the real router.

use api::{RateLimitConfig, RateLimitPolicy};
use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};

/// The fourth waitlist request in a window is refused with quota headers
#[tokio::test]
async fn test_waitlist_quota_exhausted() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let ip = fixtures::client_ip(30);

    let mut remaining = Vec::new();
    for _ in 0..3 {
        let response = server
            .post("/api/waitlist")
            .add_header("X-Forwarded-For", ip.clone())
            .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
            .await;
        response.assert_status(StatusCode::CREATED);
        remaining.push(response.header("X-RateLimit-Remaining").to_str().unwrap().to_string());
    }
    assert_eq!(remaining, ["2", "1", "0"]);

    let response = server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", ip)
        .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "RATE_001");

    assert_eq!(response.header("X-RateLimit-Limit"), "3");
    assert_eq!(response.header("X-RateLimit-Remaining"), "0");
    let retry_after: u64 = response
        .header("Retry-After")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
    assert_eq!(ctx.store.waitlist().len(), 3);
}

/// Quotas are per address
#[tokio::test]
async fn test_other_address_is_unaffected() {
    let ctx = TestContext::with_rate_limit(RateLimitConfig {
        waitlist: RateLimitPolicy::new(1, 60),
        ..RateLimitConfig::default()
    });
    let server = ctx.server();

    for n in [31, 32] {
        server
            .post("/api/waitlist")
            .add_header("X-Forwarded-For", fixtures::client_ip(n))
            .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
            .await
            .assert_status(StatusCode::CREATED);
    }
}

/// Only the first X-Forwarded-For hop identifies the caller
#[tokio::test]
async fn test_first_forwarded_hop_is_the_key() {
    let ctx = TestContext::with_rate_limit(RateLimitConfig {
        reviews: RateLimitPolicy::new(1, 60),
        ..RateLimitConfig::default()
    });
    let server = ctx.server();

    server
        .post("/api/reviews")
        .add_header("X-Forwarded-For", "198.51.100.1, 10.0.0.1")
        .json(&fixtures::review_payload())
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/api/reviews")
        .add_header("X-Forwarded-For", "198.51.100.1, 10.0.0.2")
        .json(&fixtures::review_payload())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// Exhausting one endpoint leaves the others open
#[tokio::test]
async fn test_endpoints_are_independent() {
    let ctx = TestContext::with_rate_limit(RateLimitConfig {
        waitlist: RateLimitPolicy::new(1, 60),
        ..RateLimitConfig::default()
    });
    let server = ctx.server();
    let ip = fixtures::client_ip(33);

    server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", ip.clone())
        .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", ip.clone())
        .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", ip)
        .json(&fixtures::feedback_payload())
        .await
        .assert_status(StatusCode::CREATED);
}

/// Rejected payloads still consume quota
#[tokio::test]
async fn test_invalid_requests_count() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let ip = fixtures::client_ip(34);

    for _ in 0..3 {
        server
            .post("/api/waitlist")
            .add_header("X-Forwarded-For", ip.clone())
            .json(&serde_json::json!({ "email": "bad" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    server
        .post("/api/waitlist")
        .add_header("X-Forwarded-For", ip)
        .json(&fixtures::waitlist_payload(&fixtures::unique_email()))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(ctx.store.store_calls(), 0);
}

/// No usable address means no quota
#[tokio::test]
async fn test_unknown_caller_fails_closed() {
    let ctx = TestContext::new();
    let server = ctx.server();

    // The mock transport has no peer address.
    let response = server
        .post("/api/feedback")
        .json(&fixtures::feedback_payload())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert!(ctx.store.feedback().is_empty());
}

/// A garbage forwarding header cannot be used to get a fresh bucket
#[tokio::test]
async fn test_garbage_forwarded_header_fails_closed() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for header in ["not-an-ip", "", "unknown"] {
        server
            .post("/api/reviews")
            .add_header("X-Forwarded-For", header)
            .json(&fixtures::review_payload())
            .await
            .assert_status(StatusCode::TOO_MANY_REQUESTS);
    }
    assert!(ctx.store.reviews().is_empty());
}

/// A zero quota disables the endpoint
#[tokio::test]
async fn test_zero_quota_denies() {
    let ctx = TestContext::with_rate_limit(RateLimitConfig {
        feedback: RateLimitPolicy::new(0, 60),
        ..RateLimitConfig::default()
    });
    let server = ctx.server();

    server
        .post("/api/feedback")
        .add_header("X-Forwarded-For", fixtures::client_ip(35))
        .json(&fixtures::feedback_payload())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}
