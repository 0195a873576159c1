//! Request extractors.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts},
};
use brutal_core::ClientIdentity;
use std::convert::Infallible;
use std::net::SocketAddr;

/// Normalized caller identity.
///
/// Reads `X-Forwarded-For`, then `X-Real-IP`, then the socket peer when the
/// server was started with connect info. Never rejects; an unusable address
/// shows up as one of the sentinel variants.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub ClientIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded_for = header_str(parts, "X-Forwarded-For");
        let real_ip = header_str(parts, "X-Real-IP");
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(CallerIdentity(ClientIdentity::resolve(
            forwarded_for,
            real_ip,
            peer,
        )))
    }
}

/// `User-Agent` header, for error logs.
#[derive(Debug, Clone)]
pub struct UserAgent(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for UserAgent
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(UserAgent(
            parts
                .headers
                .get(header::USER_AGENT)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string),
        ))
    }
}

/// A header that is present but not visible ASCII counts as present-and-
/// garbage, so it still resolves to the invalid sentinel.
fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .map(|h| h.to_str().unwrap_or_default())
}
