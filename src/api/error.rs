//! Error types for API operations.

use thiserror::Error;

/// Errors that can occur while talking to the StatusHawk API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}s")]
    Timeout(u64),

    /// The server rejected the session token. The session has already been
    /// invalidated globally by the time this is returned.
    #[error("Authentication failed; session cleared")]
    Unauthorized,

    /// Server returned an error response (4xx other than 401, 5xx).
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Server response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Input rejected before any network call was made.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// Classify a transport error from reqwest.
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(timeout_seconds)
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
