//! Raw provider records to an ordered, windowed launch set.
//!
//! The transformer is pure: the same records and the same `now` always give
//! the same [`LaunchSet`]. Records that cannot be normalized are dropped and
//! reported, they never fail the whole batch.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use log::debug;

use crate::models::{Launch, LaunchSet, RawLaunch, LABEL_FALLBACK};

/// Default look-ahead horizon.
pub const FILTER_WINDOW_DAYS: i64 = 30;

/// Provider timestamp layout.
const NET_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Why a record was left out of the launch set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordRejection {
    #[error("launch {id}: unparseable timestamp {value:?}")]
    InvalidTimestamp { id: String, value: String },

    #[error("launch {id}: missing field `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("launch {id}: coordinate ({latitude}, {longitude}) out of range")]
    CoordinateOutOfRange {
        id: String,
        latitude: f64,
        longitude: f64,
    },
}

/// Bookkeeping for one transform pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformReport {
    /// Records that made it into the set.
    pub accepted: usize,
    /// Records scheduled past the window.
    pub beyond_window: usize,
    pub rejected: Vec<RecordRejection>,
}

/// Transform with the default 30-day window.
pub fn transform(raw: &[RawLaunch], now: DateTime<Utc>) -> LaunchSet {
    transform_with_window(raw, now, Duration::days(FILTER_WINDOW_DAYS))
}

pub fn transform_with_window(raw: &[RawLaunch], now: DateTime<Utc>, window: Duration) -> LaunchSet {
    transform_with_report(raw, now, window).0
}

/// Normalize, filter to `net <= now + window` and sort ascending by `net`.
///
/// There is no lower bound: launches the provider still lists after their
/// scheduled time are kept.
pub fn transform_with_report(
    raw: &[RawLaunch],
    now: DateTime<Utc>,
    window: Duration,
) -> (LaunchSet, TransformReport) {
    // An oversized window saturates instead of overflowing.
    let horizon = now
        .checked_add_signed(window)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let mut report = TransformReport::default();
    let mut launches = Vec::with_capacity(raw.len());

    for record in raw {
        match normalize(record) {
            Ok(launch) if launch.net <= horizon => launches.push(launch),
            Ok(_) => report.beyond_window += 1,
            Err(rejection) => {
                debug!("Dropping record: {}", rejection);
                report.rejected.push(rejection);
            }
        }
    }

    // Stable: equal timestamps keep provider order.
    launches.sort_by_key(|l| l.net);
    report.accepted = launches.len();

    (LaunchSet::from_sorted(launches), report)
}

/// Parse a provider timestamp.
///
/// Accepts the provider's `YYYY-MM-DDTHH:MM:SSZ` layout and falls back to
/// general RFC 3339.
pub fn parse_net(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, NET_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)))
        .ok()
}

fn normalize(record: &RawLaunch) -> Result<Launch, RecordRejection> {
    let id = &record.id;
    let missing = |field: &'static str| RecordRejection::MissingField {
        id: id.clone(),
        field,
    };

    let raw_net = record.net.as_deref().ok_or_else(|| missing("net"))?;
    let net = parse_net(raw_net).ok_or_else(|| RecordRejection::InvalidTimestamp {
        id: id.clone(),
        value: raw_net.to_string(),
    })?;

    let latitude = record.pad_latitude.ok_or_else(|| missing("pad.latitude"))?;
    let longitude = record.pad_longitude.ok_or_else(|| missing("pad.longitude"))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(RecordRejection::CoordinateOutOfRange {
            id: id.clone(),
            latitude,
            longitude,
        });
    }

    let pad = record.pad_name.clone().ok_or_else(|| missing("pad.name"))?;
    let location = record
        .location_name
        .clone()
        .ok_or_else(|| missing("pad.location.name"))?;

    let mission = record
        .mission_name
        .clone()
        .unwrap_or_else(|| LABEL_FALLBACK.to_string());

    Ok(Launch {
        id: id.clone(),
        net,
        mission,
        latitude,
        longitude,
        pad,
        location,
    })
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
