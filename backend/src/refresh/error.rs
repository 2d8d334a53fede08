//! Error types for refresh cycles and startup.

use crate::services::ArtifactError;
use crate::source::SourceError;

/// Failure of a single fetch → transform → build → publish cycle.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("fetch failed: {0}")]
    Source(#[from] SourceError),

    #[error("map build failed: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Terminal startup failure. No snapshot was ever published.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("initial refresh failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: RefreshError },

    #[error("startup retry budget is zero")]
    NoAttempts,
}
