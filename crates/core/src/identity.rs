//! Caller identity derived from network addresses.
//!
//! Used as the rate limiting key and recorded on waitlist rows. Raw header
//! text never leaves this module: callers get either a parsed address or
//! one of the two sentinels.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Sentinel for requests that carried no usable address at all.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Sentinel for requests whose forwarding header could not be parsed.
pub const INVALID_IDENTITY: &str = "invalid";

/// Normalized caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientIdentity {
    Ip(IpAddr),
    Unknown,
    Invalid,
}

impl ClientIdentity {
    /// Resolve identity from the forwarding headers, falling back to the
    /// socket peer.
    ///
    /// The first hop of `X-Forwarded-For` wins, then `X-Real-IP`. A header
    /// that is present but unparsable yields [`ClientIdentity::Invalid`]
    /// rather than falling through, so a spoofed garbage header cannot be
    /// used to dodge the limiter by landing on the peer address.
    pub fn resolve(
        forwarded_for: Option<&str>,
        real_ip: Option<&str>,
        peer: Option<SocketAddr>,
    ) -> Self {
        if let Some(xff) = forwarded_for {
            let first = xff.split(',').next().unwrap_or_default();
            return Self::parse(first);
        }

        if let Some(real_ip) = real_ip {
            return Self::parse(real_ip);
        }

        match peer {
            Some(addr) => Self::Ip(normalize_ip(addr.ip())),
            None => Self::Unknown,
        }
    }

    /// Parse one address as it appears in a forwarding header.
    ///
    /// Accepts `1.2.3.4`, `1.2.3.4:8080`, `::1`, `[::1]:8080` and
    /// IPv4-mapped IPv6, which is folded to plain IPv4.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Invalid;
        }

        if let Ok(ip) = raw.parse::<IpAddr>() {
            return Self::Ip(normalize_ip(ip));
        }

        if let Ok(addr) = raw.parse::<SocketAddr>() {
            return Self::Ip(normalize_ip(addr.ip()));
        }

        // Bracketed IPv6 without a port.
        if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            if let Ok(ip) = inner.parse::<IpAddr>() {
                return Self::Ip(normalize_ip(ip));
            }
        }

        Self::Invalid
    }

    /// The address, if one was resolved.
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            Self::Ip(ip) => Some(*ip),
            _ => None,
        }
    }

    /// Whether this identity may be used as a rate limiting key.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Ip(_))
    }

    /// Whether a key string is one of the sentinels (or empty).
    pub fn is_sentinel(key: &str) -> bool {
        let key = key.trim();
        key.is_empty() || key == UNKNOWN_IDENTITY || key == INVALID_IDENTITY
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{}", ip),
            Self::Unknown => f.write_str(UNKNOWN_IDENTITY),
            Self::Invalid => f.write_str(INVALID_IDENTITY),
        }
    }
}

fn normalize_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}
