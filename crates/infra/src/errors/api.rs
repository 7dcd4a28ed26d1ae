//! Remote API error classification
//!
//! Every HTTP adapter funnels non-success responses through
//! [`ApiError::from_status`] so status handling stays uniform.

use eventide_domain::EventideError;
use reqwest::StatusCode;
use thiserror::Error;

/// Remote API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify a non-success response.
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let detail = if body.trim().is_empty() {
            format!("HTTP {} from {url}", status.as_u16())
        } else {
            format!("HTTP {} from {url}: {}", status.as_u16(), truncate(body, 256))
        };

        match status.as_u16() {
            401 | 403 => Self::Auth(detail),
            404 => Self::NotFound(detail),
            400..=499 => Self::Client(detail),
            _ => Self::Server(detail),
        }
    }
}

impl From<ApiError> for EventideError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(msg) => EventideError::Auth(msg),
            ApiError::NotFound(msg) => EventideError::NotFound(msg),
            ApiError::Client(msg) => EventideError::InvalidInput(msg),
            ApiError::Server(msg) | ApiError::Network(msg) => EventideError::RemoteUnavailable(msg),
            ApiError::Decode(msg) => EventideError::Serialization(msg),
            ApiError::Config(msg) => EventideError::Config(msg),
        }
    }
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
