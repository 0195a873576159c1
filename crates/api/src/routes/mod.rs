//! API routes.

pub mod common;
pub mod feedback;
pub mod health;
pub mod pages;
pub mod reviews;
pub mod waitlist;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use brutal_core::limits::MAX_REQUEST_BODY_BYTES;
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::middleware::{require_json, security_headers};
use crate::state::AppState;

/// Creates the full router: submission API, health probes and pages.
pub fn router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    let api = Router::new()
        .route("/waitlist", post(waitlist::waitlist_handler))
        .route("/feedback", post(feedback::feedback_handler))
        .route("/reviews", post(reviews::reviews_handler))
        // `require_json` wraps the body cap so a declared oversize length
        // is answered with the JSON 413.
        .route_layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .route_layer(from_fn(require_json))
        .route("/health", get(health::health_handler));

    Router::new()
        .nest("/api", api)
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .merge(pages::router())
        .fallback(pages::not_found)
        .layer(from_fn(security_headers))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
