//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Eventide
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EventideError {
    /// A mutation that needs a signed-in user was attempted without a session.
    #[error("User not authenticated")]
    AuthenticationRequired,

    /// Network or transport fault on any remote call.
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// A required field was absent.
    #[error("{0}")]
    ValidationMissing(String),

    /// The identity provider rejected the request.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EventideError {
    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "authentication_required",
            Self::RemoteUnavailable(_) => "remote_unavailable",
            Self::ValidationMissing(_) => "validation_missing",
            Self::Auth(_) => "auth",
            Self::Storage(_) => "storage",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for EventideError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Eventide operations
pub type Result<T> = std::result::Result<T, EventideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_required_keeps_source_message() {
        assert_eq!(EventideError::AuthenticationRequired.to_string(), "User not authenticated");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = EventideError::ValidationMissing("Missing event name or token".into());
        assert_eq!(err.to_string(), "Missing event name or token");
        assert_eq!(err.label(), "validation_missing");
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = EventideError::RemoteUnavailable("connection refused".into());
        let json = serde_json::to_value(&err).expect("serializes");
        assert_eq!(json["type"], "RemoteUnavailable");
        assert_eq!(json["message"], "connection refused");
    }
}
