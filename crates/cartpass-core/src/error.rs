//! Unified application error types for CartPass.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Every [`ErrorKind`] renders to a
//! stable machine-readable code so field-mobile clients can branch on the
//! code instead of matching message strings.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// The caller is not permitted to perform the action.
    Forbidden,
    /// A generic conflict occurred (duplicate entry, concurrent modification).
    Conflict,
    /// The sticker has already been activated by another actor.
    AlreadyActivated,
    /// The amount paid does not match the computed price.
    AmountMismatch,
    /// A generated sticker code collided with an existing one.
    DuplicateCode,
    /// The batch has activated stickers and cannot be deleted.
    BatchHasActivations,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::AlreadyActivated => write!(f, "ALREADY_ACTIVATED"),
            Self::AmountMismatch => write!(f, "AMOUNT_MISMATCH"),
            Self::DuplicateCode => write!(f, "DUPLICATE_CODE"),
            Self::BatchHasActivations => write!(f, "BATCH_HAS_ACTIVATIONS"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// The unified application error used throughout CartPass.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. Domain outcomes that clients must branch
/// on (already activated, amount mismatch) carry a structured `details`
/// payload alongside the human-readable message.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Structured, machine-readable payload for client display logic.
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach a structured details payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// The sticker was already activated; carries the winning activation's
    /// actor and timestamp so the caller can explain "already done by X at T".
    pub fn already_activated(activated_at: Option<DateTime<Utc>>, activated_by: Option<Uuid>) -> Self {
        Self::new(
            ErrorKind::AlreadyActivated,
            "Sticker has already been activated",
        )
        .with_details(serde_json::json!({
            "activated_at": activated_at,
            "activated_by": activated_by,
        }))
    }

    /// The amount paid does not match the computed price; carries both sides
    /// so the client UI can correct itself.
    pub fn amount_mismatch(expected_kobo: i64, provided_kobo: i64) -> Self {
        Self::new(
            ErrorKind::AmountMismatch,
            format!("Amount paid does not match the expected price: expected {expected_kobo} kobo, got {provided_kobo} kobo"),
        )
        .with_details(serde_json::json!({
            "expected_kobo": expected_kobo,
            "provided_kobo": provided_kobo,
        }))
    }

    /// A generated code collided with an existing sticker code.
    pub fn duplicate_code(code: impl Into<String>) -> Self {
        let code = code.into();
        Self::new(
            ErrorKind::DuplicateCode,
            format!("Generated sticker code '{code}' already exists"),
        )
        .with_details(serde_json::json!({ "code": code }))
    }

    /// The batch has activated stickers and cannot be deleted.
    pub fn batch_has_activations(batch_code: impl Into<String>, activated_count: i64) -> Self {
        let batch_code = batch_code.into();
        Self::new(
            ErrorKind::BatchHasActivations,
            format!("Batch '{batch_code}' has {activated_count} activated sticker(s) and cannot be deleted"),
        )
        .with_details(serde_json::json!({
            "batch_code": batch_code,
            "activated_count": activated_count,
        }))
    }

    /// Whether this error is the expected at-most-once activation outcome.
    pub fn is_already_activated(&self) -> bool {
        self.kind == ErrorKind::AlreadyActivated
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Standard API error response body.
///
/// Lives next to [`AppError`] so the `IntoResponse` mapping can be
/// implemented here (coherence); only compiled for the HTTP-facing crates
/// via the `axum` feature.
#[cfg(feature = "axum")]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Structured payload for client display logic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let status = match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict | ErrorKind::AlreadyActivated | ErrorKind::BatchHasActivations => {
                StatusCode::CONFLICT
            }
            ErrorKind::AmountMismatch => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::DuplicateCode
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Internal => {
                tracing::error!(error = %self.message, kind = %self.kind, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            error: self.kind.to_string(),
            message: self.message,
            details: self.details,
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ErrorKind::AlreadyActivated.to_string(), "ALREADY_ACTIVATED");
        assert_eq!(ErrorKind::AmountMismatch.to_string(), "AMOUNT_MISMATCH");
        assert_eq!(
            ErrorKind::BatchHasActivations.to_string(),
            "BATCH_HAS_ACTIVATIONS"
        );
    }

    #[test]
    fn amount_mismatch_carries_both_sides() {
        let err = AppError::amount_mismatch(680_000, 680_002);
        let details = err.details.expect("details payload");
        assert_eq!(details["expected_kobo"], 680_000);
        assert_eq!(details["provided_kobo"], 680_002);
    }

    #[test]
    fn already_activated_is_detectable() {
        let err = AppError::already_activated(Some(Utc::now()), Some(Uuid::new_v4()));
        assert!(err.is_already_activated());
        assert!(!AppError::not_found("x").is_already_activated());
    }
}
