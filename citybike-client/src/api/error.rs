//! API error types.

use std::sync::Arc;

use crate::domain::DomainError;

/// Errors that can occur when talking to the journeys API.
///
/// Cloneable so one failed fetch can be reported to every caller that was
/// waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),

    /// The requested station or journey does not exist
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The request was rejected before or by the backend
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// API returned an unexpected error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Waiting for a set of responses took too long
    #[error("timed out waiting for responses")]
    Timeout,
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(Arc::new(err))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::InvalidInput {
            message: err.to_string(),
        }
    }
}
