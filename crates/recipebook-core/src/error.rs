//! Error types for the recipebook client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, missing records, service-side rejections,
//! local validation and orchestration misuse.

use std::fmt;
use thiserror::Error;

/// The unified error type for recipebook operations.
///
/// Every gateway and orchestration call reports failures through this type,
/// so callers can decide per variant whether to show an inline message,
/// force re-authentication, or simply degrade.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, I/O).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (invalid credentials, expired or cleared session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The requested recipe does not exist (or is not visible to this account).
    #[error("recipe not found: {id}")]
    NotFound { id: String },

    /// Non-success responses from the records service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A form snapshot failed local validation and never reached the network.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Malformed identifiers, URLs or page requests.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// A dialog or confirmation surface was used outside its lifecycle.
    #[error("{0}")]
    Surface(#[from] SurfaceError),
}

impl Error {
    /// Create a not-found error for a record id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Returns true when the session is no longer usable and the user has to
    /// sign in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// The message to show inline next to the surface that issued the call.
    ///
    /// Service-provided messages win over the generic display form.
    pub fn user_message(&self) -> String {
        match self {
            Error::Protocol(err) => err
                .message
                .clone()
                .unwrap_or_else(|| format!("Request failed with HTTP {}", err.status)),
            Error::NotFound { id } => format!("Recipe '{}' no longer exists", id),
            Error::Validation(err) => err.to_string(),
            Error::Auth(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error (body decoding, redirects, ...).
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Local storage I/O failed.
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io {
            message: err.to_string(),
        }
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session tokens are available for an authenticated call.
    #[error("not signed in")]
    NotAuthenticated,

    /// Invalid credentials provided.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The service rejected the access token.
    #[error("session expired")]
    SessionExpired,

    /// The session was cleared while the request was in flight.
    #[error("session was cleared while the request was in flight")]
    SessionCleared,

    /// Refresh token is invalid or expired.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,
}

/// Service-side rejection of a request.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the service.
    pub message: Option<String>,
    /// Per-field validation messages, if the service sent any.
    pub details: Vec<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        if !self.details.is_empty() {
            write!(f, " ({})", self.details.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self {
            status,
            message,
            details: Vec::new(),
        }
    }

    /// Attach per-field validation messages.
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
    }
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// The field name as shown on the form.
    pub field: &'static str,
    /// Human readable reason.
    pub message: String,
}

/// Local validation failure of a form snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Build a validation error from the collected violations.
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Returns the individual field violations.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns true if the given field was rejected.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Input validation errors for value types.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid record identifier.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Invalid service URL.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// Invalid page request.
    #[error("invalid page request: {reason}")]
    PageRequest { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Misuse of a dialog or confirmation surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The dialog already resolved its outcome.
    #[error("the dialog has already been closed")]
    DialogClosed,

    /// Another confirmation prompt is still waiting for an answer.
    #[error("a confirmation prompt is already open")]
    ConfirmationPending,

    /// The dialog is still waiting for its previous submission.
    #[error("a submission is already in progress")]
    SubmissionPending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_service_message() {
        let err = Error::Protocol(ProtocolError::new(
            400,
            Some("Recipe name is required".to_string()),
        ));
        assert_eq!(err.user_message(), "Recipe name is required");
    }

    #[test]
    fn user_message_falls_back_to_status() {
        let err = Error::Protocol(ProtocolError::new(500, None));
        assert_eq!(err.user_message(), "Request failed with HTTP 500");
    }

    #[test]
    fn only_auth_errors_require_reauth() {
        assert!(Error::Auth(AuthError::SessionExpired).requires_reauth());
        assert!(Error::Auth(AuthError::SessionCleared).requires_reauth());
        assert!(!Error::not_found("abc").requires_reauth());
        assert!(
            !Error::Transport(TransportError::Timeout { duration_ms: 10 }).requires_reauth()
        );
    }

    #[test]
    fn protocol_display_includes_details() {
        let err = ProtocolError::new(400, Some("Validation error".to_string()))
            .with_details(vec!["name: must not be blank".to_string()]);
        assert_eq!(
            err.to_string(),
            "HTTP 400: Validation error (name: must not be blank)"
        );
    }

    #[test]
    fn validation_error_lists_fields() {
        let err = ValidationError::new(vec![
            FieldViolation {
                field: "name",
                message: "Recipe name is required".to_string(),
            },
            FieldViolation {
                field: "ingredients",
                message: "Every ingredient needs a value".to_string(),
            },
        ]);
        assert!(err.has_field("ingredients"));
        assert!(!err.has_field("cookingInstruction"));
        assert_eq!(
            err.to_string(),
            "Recipe name is required; Every ingredient needs a value"
        );
    }
}
