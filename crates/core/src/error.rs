//! Unified error types for the landing service.
//!
//! Error codes:
//! - VALID_001-005: Validation errors (caller-correctable)
//! - RATE_001: Rate limit errors (transient)
//! - DB_001-002: Datastore errors
//! - INTERNAL_001: Anything else

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Body is not valid JSON or has the wrong shape
    InvalidFormat,
    /// VALID_002: A required field is missing or empty
    MissingField,
    /// VALID_003: Email failed syntax checks
    InvalidEmail,
    /// VALID_004: Name failed character checks
    InvalidName,
    /// VALID_005: Payload exceeds the request size limit
    PayloadTooLarge,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "VALID_001",
            Self::MissingField => "VALID_002",
            Self::InvalidEmail => "VALID_003",
            Self::InvalidName => "VALID_004",
            Self::PayloadTooLarge => "VALID_005",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::PayloadTooLarge => 413,
            _ => 400,
        }
    }
}

/// Database error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// DB_001: Schema could not be ensured (unreachable or migration failed)
    SchemaSetup,
    /// DB_002: Lookup or insert failed
    QueryFailed,
}

impl DbErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaSetup => "DB_001",
            Self::QueryFailed => "DB_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::SchemaSetup => 503,
            Self::QueryFailed => 500,
        }
    }
}

/// Rate limit error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitErrorCode {
    /// RATE_001: Rate limit exceeded
    Exceeded,
}

impl RateLimitErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Exceeded => "RATE_001",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        429
    }
}

/// Unified error type for the landing service.
#[derive(Debug, Error)]
pub enum Error {
    /// Validation error with code.
    #[error("[{code}] {message}")]
    Validation {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Database error with code.
    #[error("[{code}] {message}")]
    Database {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Rate limit error with code.
    #[error("[{code}] {message}")]
    RateLimit {
        code: &'static str,
        message: String,
        http_status: u16,
        retry_after: Option<u64>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error with code.
    pub fn validation(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::Validation {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a database error.
    pub fn database(code: DbErrorCode, msg: impl Into<String>) -> Self {
        Self::Database {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Schema could not be ensured; fatal for the request.
    pub fn schema_setup(msg: impl Into<String>) -> Self {
        Self::database(DbErrorCode::SchemaSetup, msg)
    }

    /// A lookup or insert failed.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::database(DbErrorCode::QueryFailed, msg)
    }

    /// Create a rate limit error.
    pub fn rate_limit(
        code: RateLimitErrorCode,
        msg: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self::RateLimit {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
            retry_after,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { http_status, .. } => *http_status,
            Self::Database { http_status, .. } => *http_status,
            Self::RateLimit { http_status, .. } => *http_status,
            Self::Serialization(_) => 400,
            Self::Config(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. } => code,
            Self::Database { code, .. } => code,
            Self::RateLimit { code, .. } => code,
            Self::Serialization(_) => ValidationErrorCode::InvalidFormat.code(),
            Self::Config(_) => DbErrorCode::SchemaSetup.code(),
            Self::Internal(_) => "INTERNAL_001",
        }
    }

    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}
