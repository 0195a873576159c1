//! Input validation and sanitization.
//!
//! Every function here is total: it never panics for any `&str` and always
//! hands back a value the caller can branch on.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use thiserror::Error;

use crate::limits::{MAX_EMAIL_LEN, MAX_NAME_LEN, MIN_EMAIL_LEN};

/// Local part and dot-separated domain labels. Requires at least one dot in
/// the domain, so `a@b` is rejected.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("invalid email pattern")
});

/// Script-capable URL schemes and inline event handlers (`onclick=`).
static DANGEROUS_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:javascript|vbscript|data)\s*:|\bon[a-z]+\s*=")
        .expect("invalid sanitizer pattern")
});

/// Characters removed outright by [`sanitize_input`].
const STRIPPED_CHARS: [char; 6] = ['<', '>', '\'', '"', '&', '\0'];

/// Syntactic email check.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < MIN_EMAIL_LEN || email.len() > MAX_EMAIL_LEN {
        return false;
    }

    if email.contains("..") || email.starts_with('.') || email.ends_with('.') {
        return false;
    }

    let Some((local, _domain)) = email.rsplit_once('@') else {
        return false;
    };

    if local.ends_with('.') {
        return false;
    }

    EMAIL_REGEX.is_match(email)
}

/// Trim, truncate to `max_len` characters, and strip anything usable for
/// markup or script injection.
pub fn sanitize_input(input: &str, max_len: usize) -> String {
    let mut out: String = input
        .trim()
        .chars()
        .take(max_len)
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    // Removing one match can splice a new one together ("javajavascript:script:").
    loop {
        let next = match DANGEROUS_PATTERNS.replace_all(&out, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => next,
        };
        out = next;
    }

    out.trim().to_string()
}

/// Why a name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,
    #[error("Name can only contain letters, spaces, hyphens and apostrophes")]
    InvalidCharacters,
}

/// Sanitize a display name and check its character set.
pub fn validate_name(input: &str) -> Result<String, NameError> {
    let name = sanitize_input(input, MAX_NAME_LEN);

    if name.is_empty() {
        return Err(NameError::Empty);
    }

    let allowed = |c: char| c.is_alphabetic() || matches!(c, ' ' | '-' | '\'' | '\u{2019}');
    if !name.chars().all(allowed) {
        return Err(NameError::InvalidCharacters);
    }

    Ok(name)
}
