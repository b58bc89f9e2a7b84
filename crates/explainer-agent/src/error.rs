//! Error types for text completion backends.

use thiserror::Error;

/// Errors returned by a [`TextCompletion`](crate::TextCompletion) backend.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The request never produced an HTTP response.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The provider answered, but without any candidate text.
    #[error("Provider returned no text")]
    EmptyResponse,

    /// The provider's reply could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::Request(e) => e.is_timeout() || e.is_connect(),
            CompletionError::Api { status, .. } => *status == 429 || *status >= 500,
            CompletionError::EmptyResponse | CompletionError::InvalidResponse(_) => false,
        }
    }

    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            CompletionError::Request(_) => "REQUEST_FAILED",
            CompletionError::Api { .. } => "API_ERROR",
            CompletionError::EmptyResponse => "EMPTY_RESPONSE",
            CompletionError::InvalidResponse(_) => "INVALID_RESPONSE",
        }
    }
}

/// Result type for completion calls.
pub type CompletionResult<T> = Result<T, CompletionError>;

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::InvalidResponse(err.to_string())
    }
}
