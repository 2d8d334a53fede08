// ============================================================================
// Upstream response types
// ============================================================================
//
// Only the fields the service consumes are modelled. The provider sends pad
// coordinates as decimal strings; plain JSON numbers are accepted too.

use serde::Deserialize;
use serde_json::Value;

use super::error::{SourceError, SourceResult};
use crate::models::RawLaunch;

/// Body of `GET /launch/upcoming/`.
#[derive(Debug, Deserialize)]
pub struct UpcomingLaunchesResponse {
    #[serde(default)]
    pub count: Option<u64>,
    pub results: Vec<LaunchRecord>,
}

#[derive(Debug, Deserialize)]
pub struct LaunchRecord {
    pub id: Value,
    #[serde(default)]
    pub net: Option<String>,
    #[serde(default)]
    pub mission: Option<MissionRecord>,
    #[serde(default)]
    pub pad: Option<PadRecord>,
}

#[derive(Debug, Deserialize)]
pub struct MissionRecord {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PadRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub location: Option<LocationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<LaunchRecord> for RawLaunch {
    fn from(record: LaunchRecord) -> Self {
        let id = match record.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let pad = record.pad;

        RawLaunch {
            id,
            net: record.net,
            mission_name: record.mission.and_then(|m| m.name),
            pad_latitude: pad.as_ref().and_then(|p| coordinate(p.latitude.as_ref())),
            pad_longitude: pad.as_ref().and_then(|p| coordinate(p.longitude.as_ref())),
            pad_name: pad.as_ref().and_then(|p| p.name.clone()),
            location_name: pad
                .and_then(|p| p.location)
                .and_then(|location| location.name),
        }
    }
}

/// Accept a coordinate as a JSON number or a numeric string.
fn coordinate(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parse an upcoming-launches body into raw records.
///
/// A body without a `results` list is malformed; individual records with bad
/// fields are passed through for the transformer to judge.
pub fn parse_upcoming_launches(body: &str) -> SourceResult<Vec<RawLaunch>> {
    let response: UpcomingLaunchesResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::MalformedBody(e.to_string()))?;
    Ok(response.results.into_iter().map(RawLaunch::from).collect())
}
