use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{LaunchMap, LaunchSet};
use crate::services::fingerprint;

/// The published view: a launch set, the map built from it, and the
/// instant it was published.
///
/// Snapshots are immutable once published and are shared as
/// `Arc<Snapshot>`. The generation is assigned by the store at publish time.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    generation: u64,
    launches: LaunchSet,
    map: LaunchMap,
    generated_at: DateTime<Utc>,
    fingerprint: String,
}

impl Snapshot {
    /// `map` must have been built from `launches`.
    pub fn new(launches: LaunchSet, map: LaunchMap, generated_at: DateTime<Utc>) -> Self {
        let fingerprint = fingerprint(&launches);
        Self {
            generation: 0,
            launches,
            map,
            generated_at,
            fingerprint,
        }
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Publish sequence number, starting at 1. Unpublished snapshots report 0.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn launches(&self) -> &LaunchSet {
        &self.launches
    }

    pub fn map(&self) -> &LaunchMap {
        &self.map
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// SHA-256 of the serialized launch set.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
