//! Core types, validation and error taxonomy for the BRUTAL landing service.

pub mod error;
pub mod identity;
pub mod limits;
pub mod submission;
pub mod validation;

pub use error::{DbErrorCode, Error, RateLimitErrorCode, Result, ValidationErrorCode};
pub use identity::*;
pub use submission::*;
pub use validation::*;
