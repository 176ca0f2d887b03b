//! Gateway error classification.

use notes_core::GatewayError;

/// Upstream failure categories, derived from the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model or endpoint not found.
    NotFound,
    /// Request rejected as malformed or too large.
    BadRequest,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl UpstreamErrorCode {
    /// Determine error code from HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::AuthenticationError,
            429 => Self::RateLimitExceeded,
            404 => Self::NotFound,
            400 | 413 | 422 => Self::BadRequest,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether a caller wrapping the gateway could reasonably retry.
    ///
    /// The gateway itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::ServerError)
    }
}

/// Map a reqwest transport error onto the gateway taxonomy.
pub fn classify_transport_error(e: &reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout(e.to_string())
    } else {
        GatewayError::Transport(e.to_string())
    }
}
