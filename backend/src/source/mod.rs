//! Upstream launch schedule source.
//!
//! [`LaunchSource`] is the seam between the refresh scheduler and the outside
//! world. [`LaunchLibraryClient`] talks to the real provider; tests supply
//! scripted sources.

pub mod client;
pub mod error;
pub mod wire;

use async_trait::async_trait;

use crate::models::RawLaunch;

pub use client::{LaunchLibraryClient, DEFAULT_ENDPOINT};
pub use error::{FailureKind, SourceError, SourceResult};
pub use wire::parse_upcoming_launches;

/// A stateless provider of raw launch records.
///
/// Each call is one independent round trip; implementations must be safe to
/// call repeatedly and from any task.
#[async_trait]
pub trait LaunchSource: Send + Sync {
    async fn fetch(&self) -> SourceResult<Vec<RawLaunch>>;
}
