//! Launch records as fetched from the provider and as published to readers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label used when the provider does not name the mission.
pub const LABEL_FALLBACK: &str = "N/A";

/// Provider-supplied launch record.
///
/// Every field except `id` may be absent or malformed upstream; the
/// transformer decides which records survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLaunch {
    pub id: String,
    /// Scheduled launch time as sent by the provider (`YYYY-MM-DDTHH:MM:SSZ`).
    pub net: Option<String>,
    pub mission_name: Option<String>,
    pub pad_latitude: Option<f64>,
    pub pad_longitude: Option<f64>,
    pub pad_name: Option<String>,
    pub location_name: Option<String>,
}

/// A normalized launch, derived 1:1 from a [`RawLaunch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub id: String,
    /// Scheduled launch time (UTC).
    pub net: DateTime<Utc>,
    /// Mission name, or [`LABEL_FALLBACK`].
    pub mission: String,
    pub latitude: f64,
    pub longitude: f64,
    pub pad: String,
    pub location: String,
}

/// Launches ordered by scheduled time, ties kept in provider order.
///
/// Only the transformer builds non-empty sets, so the ordering invariant
/// holds for every value of this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LaunchSet {
    launches: Vec<Launch>,
}

impl LaunchSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Callers must pass launches already sorted by `net`.
    pub(crate) fn from_sorted(launches: Vec<Launch>) -> Self {
        debug_assert!(launches.windows(2).all(|w| w[0].net <= w[1].net));
        Self { launches }
    }

    /// The next upcoming launch, if any.
    pub fn first(&self) -> Option<&Launch> {
        self.launches.first()
    }

    pub fn len(&self) -> usize {
        self.launches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.launches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Launch> {
        self.launches.iter()
    }

    pub fn as_slice(&self) -> &[Launch] {
        &self.launches
    }

    /// Keep only the first `limit` launches.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.launches.truncate(limit);
        self
    }
}

impl<'a> IntoIterator for &'a LaunchSet {
    type Item = &'a Launch;
    type IntoIter = std::slice::Iter<'a, Launch>;

    fn into_iter(self) -> Self::IntoIter {
        self.launches.iter()
    }
}
