//! Error taxonomy for Mindscape API calls.

use thiserror::Error;

/// Failure modes surfaced to callers of the API clients.
///
/// Every failure is returned typed to the immediate caller; the only
/// automatic recovery anywhere in this crate is the bounded retry the upload
/// client performs for 503/504 responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL could not be parsed or joined with an
    /// endpoint path. Raised at client construction, before any network
    /// activity.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The request could not be completed at the network layer (connection
    /// reset, DNS failure, timeout). Never retried.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-2xx status, either immediately for a
    /// non-retryable status or after the retry ceiling was exhausted.
    #[error("server returned {status}: {body}")]
    Server {
        status: u16,
        /// Response body rendered as lossy text, for diagnostics only.
        body: String,
    },

    /// A 2xx response body was not valid JSON or did not match the expected
    /// shape. Never retried; a repeat upload will not fix a shape mismatch.
    #[error("failed to decode response: {0}")]
    Decoding(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status carried by a server error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias used throughout the client modules.
pub type Result<T> = std::result::Result<T, ApiError>;
