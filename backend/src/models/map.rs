//! Display artifact built from a launch set.

use serde::{Deserialize, Serialize};

/// A point on the map in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Marker colour. The next launch gets its own colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    /// Id of the launch this marker was built from.
    pub launch_id: String,
    pub position: GeoPoint,
    /// HTML popup body.
    pub popup: String,
    pub color: MarkerColor,
    pub icon: String,
    /// True only for the first launch of the set.
    pub next: bool,
}

/// Marker map, one marker per launch in set order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchMap {
    pub center: GeoPoint,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl LaunchMap {
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn next_marker(&self) -> Option<&MapMarker> {
        self.markers.iter().find(|m| m.next)
    }
}
