//! Error types for the upstream source client.

use std::time::Duration;

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Coarse failure classes. Callers decide retry policy on these alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error or timeout.
    Transport,
    /// Non-success status or malformed body.
    Response,
}

/// Error type for a single fetch.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    MalformedBody(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl SourceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::Transport(_) | SourceError::Timeout(_) | SourceError::ClientBuild(_) => {
                FailureKind::Transport
            }
            SourceError::Status { .. } | SourceError::MalformedBody(_) => FailureKind::Response,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Transport(format!("request timed out: {}", err))
        } else if err.is_decode() {
            SourceError::MalformedBody(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}
