//! Data Transfer Objects for the HTTP API.
//!
//! Countdowns are computed here, at response time, against the instant the
//! handler read; the snapshot itself stores only scheduled times.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Countdown, Launch, LaunchMap, Snapshot};
use crate::refresh::{RefreshStats, SchedulerState};

/// One launch with its countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchDto {
    pub id: String,
    pub mission: String,
    pub net: DateTime<Utc>,
    pub pad: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Whole seconds until launch, negative once passed
    pub countdown_seconds: i64,
    /// Countdown as `"{d}d {h}h {m}m {s}s"`
    pub countdown: String,
}

impl LaunchDto {
    pub fn from_launch(launch: &Launch, now: DateTime<Utc>) -> Self {
        let countdown = Countdown::between(launch.net, now);
        Self {
            id: launch.id.clone(),
            mission: launch.mission.clone(),
            net: launch.net,
            pad: launch.pad.clone(),
            location: launch.location.clone(),
            latitude: launch.latitude,
            longitude: launch.longitude,
            countdown_seconds: countdown.seconds(),
            countdown: countdown.to_string(),
        }
    }
}

/// Response for `GET /v1/launches` and each SSE event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub generation: u64,
    pub generated_at: DateTime<Utc>,
    pub fingerprint: String,
    pub total: usize,
    pub launches: Vec<LaunchDto>,
    pub map: LaunchMap,
}

impl SnapshotResponse {
    pub fn from_snapshot(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        let launches: Vec<LaunchDto> = snapshot
            .launches()
            .iter()
            .map(|launch| LaunchDto::from_launch(launch, now))
            .collect();

        Self {
            generation: snapshot.generation(),
            generated_at: snapshot.generated_at(),
            fingerprint: snapshot.fingerprint().to_string(),
            total: launches.len(),
            launches,
            map: snapshot.map().clone(),
        }
    }
}

/// Response for `GET /v1/launches/next`.
///
/// `launch` is null when the last refresh found nothing in the window;
/// `last_refresh` is present either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextLaunchResponse {
    pub launch: Option<LaunchDto>,
    pub generation: u64,
    pub last_refresh: DateTime<Utc>,
}

impl NextLaunchResponse {
    pub fn from_snapshot(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        Self {
            launch: snapshot
                .launches()
                .first()
                .map(|launch| LaunchDto::from_launch(launch, now)),
            generation: snapshot.generation(),
            last_refresh: snapshot.generated_at(),
        }
    }
}

/// Response for `GET /v1/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub scheduler: SchedulerState,
    /// 0 before the first publish
    pub generation: u64,
    pub last_refresh: Option<DateTime<Utc>>,
    pub fingerprint: Option<String>,
    pub launch_count: usize,
    pub stats: RefreshStats,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Whether a snapshot has been published
    pub ready: bool,
}
