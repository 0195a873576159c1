//! Form submission payloads and their validated, sanitized forms.
//!
//! Payloads are deserialized loosely (every field optional) and then turned
//! into `New*Entry` values, which are the only thing the store accepts.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result, ValidationErrorCode};
use crate::limits::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_TEXT_LEN};
use crate::validation::{is_valid_email, sanitize_input, validate_name};

/// The three write endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Waitlist,
    Feedback,
    Reviews,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Self::Waitlist, Self::Feedback, Self::Reviews];

    /// Rate limit scope; quotas are independent per scope.
    pub fn scope(&self) -> &'static str {
        match self {
            Self::Waitlist => "waitlist",
            Self::Feedback => "feedback",
            Self::Reviews => "reviews",
        }
    }

    /// Backing table name.
    pub fn table(&self) -> &'static str {
        // Scopes and tables happen to share names.
        self.scope()
    }
}

/// Page the client should navigate to after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Thanks,
    AlreadyJoined,
    Noted,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Thanks => "/thanks",
            Self::AlreadyJoined => "/already",
            Self::Noted => "/noted",
        }
    }
}

pub const WAITLIST_JOINED_MESSAGE: &str = "You're in.";
pub const WAITLIST_ALREADY_MESSAGE: &str = "You're already part of this.";
pub const FEEDBACK_MESSAGE: &str = "We've got your input. Raw and real.";
pub const REVIEW_MESSAGE: &str = "Your review is locked in.";

/// Result of a waitlist insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitlistOutcome {
    Joined(Uuid),
    AlreadyJoined,
}

// === Waitlist ===

/// `POST /api/waitlist` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WaitlistRequest {
    #[validate(length(max = 10240))]
    pub email: Option<String>,
    #[validate(length(max = 10240))]
    pub name: Option<String>,
}

/// A waitlist signup ready to persist. Email is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWaitlistEntry {
    pub email: String,
    pub name: Option<String>,
    pub ip_address: Option<IpAddr>,
}

impl WaitlistRequest {
    pub fn into_entry(self, ip_address: Option<IpAddr>) -> Result<NewWaitlistEntry> {
        check_field_caps(&self)?;

        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        if email.is_empty() {
            return Err(Error::validation(
                ValidationErrorCode::MissingField,
                "Valid email is required",
            ));
        }
        let email = clean_email(email).ok_or_else(|| {
            Error::validation(ValidationErrorCode::InvalidEmail, "Valid email is required")
        })?;

        let name = match self.name.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                validate_name(raw)
                    .map_err(|e| Error::validation(ValidationErrorCode::InvalidName, e.to_string()))?,
            ),
            _ => None,
        };

        Ok(NewWaitlistEntry {
            email: email.to_lowercase(),
            name,
            ip_address,
        })
    }
}

// === Feedback ===

/// `POST /api/feedback` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(max = 10240))]
    pub name: Option<String>,
    #[validate(length(max = 10240))]
    pub email: Option<String>,
    #[validate(length(max = 10240))]
    pub ideas: Option<String>,
    #[validate(length(max = 10240))]
    pub views: Option<String>,
    #[validate(length(max = 10240))]
    pub suggestions: Option<String>,
    #[validate(length(max = 10240))]
    pub wants: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedbackEntry {
    pub name: Option<String>,
    pub email: Option<String>,
    pub ideas: Option<String>,
    pub views: Option<String>,
    pub suggestions: Option<String>,
    pub wants: Option<String>,
}

impl FeedbackRequest {
    pub fn into_entry(self) -> Result<NewFeedbackEntry> {
        check_field_caps(&self)?;

        let ideas = clean_text(self.ideas.as_deref());
        let views = clean_text(self.views.as_deref());
        let suggestions = clean_text(self.suggestions.as_deref());
        let wants = clean_text(self.wants.as_deref());

        if ideas.is_none() && views.is_none() && suggestions.is_none() && wants.is_none() {
            return Err(Error::validation(
                ValidationErrorCode::MissingField,
                "At least one field must be filled",
            ));
        }

        Ok(NewFeedbackEntry {
            name: clean_name(self.name.as_deref()),
            email: optional_email(self.email.as_deref())?,
            ideas,
            views,
            suggestions,
            wants,
        })
    }
}

// === Reviews ===

/// `POST /api/reviews` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(max = 10240))]
    pub name: Option<String>,
    #[validate(length(max = 10240))]
    pub email: Option<String>,
    #[validate(length(max = 10240))]
    pub review: Option<String>,
    #[validate(length(max = 10240))]
    pub idea_opinion: Option<String>,
    #[validate(length(max = 10240))]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewEntry {
    pub name: Option<String>,
    pub email: Option<String>,
    pub review: Option<String>,
    pub idea_opinion: Option<String>,
    pub suggestion: Option<String>,
}

impl ReviewRequest {
    pub fn into_entry(self) -> Result<NewReviewEntry> {
        check_field_caps(&self)?;

        let review = clean_text(self.review.as_deref());
        let idea_opinion = clean_text(self.idea_opinion.as_deref());

        // `suggestion` alone does not count as a review.
        if review.is_none() && idea_opinion.is_none() {
            return Err(Error::validation(
                ValidationErrorCode::MissingField,
                "At least one review or opinion must be provided",
            ));
        }

        Ok(NewReviewEntry {
            name: clean_name(self.name.as_deref()),
            email: optional_email(self.email.as_deref())?,
            review,
            idea_opinion,
            suggestion: clean_text(self.suggestion.as_deref()),
        })
    }
}

// === Helpers ===

fn check_field_caps(payload: &impl Validate) -> Result<()> {
    payload.validate().map_err(|e| {
        Error::validation(
            ValidationErrorCode::InvalidFormat,
            format!("Field too long: {}", e),
        )
    })
}

/// Sanitized free text, `None` when nothing survives sanitization.
fn clean_text(raw: Option<&str>) -> Option<String> {
    raw.map(|s| sanitize_input(s, MAX_TEXT_LEN))
        .filter(|s| !s.is_empty())
}

fn clean_name(raw: Option<&str>) -> Option<String> {
    raw.map(|s| sanitize_input(s, MAX_NAME_LEN))
        .filter(|s| !s.is_empty())
}

/// Email is optional on feedback and reviews, but must be valid if given.
fn optional_email(raw: Option<&str>) -> Result<Option<String>> {
    match raw.map(str::trim) {
        Some(email) if !email.is_empty() => clean_email(email).map(Some).ok_or_else(|| {
            Error::validation(ValidationErrorCode::InvalidEmail, "Email address is invalid")
        }),
        _ => Ok(None),
    }
}

/// A trimmed email that sanitization leaves untouched and that passes the
/// syntax check. Addresses carrying markup or handler text are refused
/// rather than silently rewritten.
fn clean_email(email: &str) -> Option<String> {
    let sanitized = sanitize_input(email, MAX_EMAIL_LEN);
    (sanitized == email && is_valid_email(&sanitized)).then_some(sanitized)
}
