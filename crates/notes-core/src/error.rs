//! Error types for the notes AI assistant.

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by a model gateway call.
///
/// None of these are retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Connect, read, or write deadline exceeded
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection-level failure other than a timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// 2xx body did not contain `choices[0].message.content`
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Gateway could not be constructed from its configuration
    #[error("Gateway configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// HTTP status reported by the upstream, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Core error type for assistant operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Model gateway call failed
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Invalid input (blank content, oversized message)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Analysis kind not in the supported set
    #[error("Unsupported analysis type: {0}")]
    UnsupportedAnalysisKind(String),

    /// Session store read or write failed
    #[error("Session store error: {0}")]
    SessionStore(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the failure was rejected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::UnsupportedAnalysisKind(_)
        )
    }
}
