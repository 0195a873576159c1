//! Request guards and response hardening headers.

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use brutal_core::{limits::MAX_REQUEST_BODY_BYTES, ValidationErrorCode};
use tracing::debug;

use crate::response::ApiError;

const SECURITY_HEADERS: [(&str, &str); 5] = [
    ("x-dns-prefetch-control", "off"),
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("x-xss-protection", "1; mode=block"),
];

/// Adds the hardening headers to every response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}

/// Rejects oversized or non-JSON POST bodies before they reach a handler.
///
/// Only the declared `Content-Length` is inspected here. Bodies streamed
/// without one are capped by `RequestBodyLimitLayer` and reported while the
/// handler buffers them.
pub async fn require_json(request: Request, next: Next) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let declared_len = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok());

    if let Some(len) = declared_len {
        if len > MAX_REQUEST_BODY_BYTES {
            debug!(len, path = %request.uri().path(), "Rejecting oversized body");
            return ApiError::validation(ValidationErrorCode::PayloadTooLarge, "Payload too large")
                .into_response();
        }
    }

    if !is_json(&request) {
        debug!(path = %request.uri().path(), "Rejecting non-JSON content type");
        return ApiError::validation(ValidationErrorCode::InvalidFormat, "Invalid content type")
            .into_response();
    }

    next.run(request).await
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}
