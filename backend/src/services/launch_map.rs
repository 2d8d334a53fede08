//! Marker map construction for the launch page.

use chrono::{DateTime, Utc};

use crate::models::{Countdown, GeoPoint, LaunchMap, LaunchSet, MapMarker, MarkerColor};

/// Cape Canaveral, the default map centre.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    latitude: 28.4555,
    longitude: -80.5287,
};
pub const DEFAULT_ZOOM: u8 = 10;

const MARKER_ICON: &str = "rocket";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("invalid map configuration: {0}")]
    InvalidConfig(String),
}

/// Builds the display artifact for a launch set.
///
/// Implementations must not assume the set is non-empty and must mark the
/// first launch distinctly from the rest.
pub trait ArtifactBuilder: Send + Sync {
    fn build(&self, launches: &LaunchSet, now: DateTime<Utc>) -> Result<LaunchMap, ArtifactError>;
}

/// Default builder: one marker per launch, the next launch in green.
#[derive(Debug, Clone)]
pub struct MarkerMapBuilder {
    center: GeoPoint,
    zoom: u8,
}

impl MarkerMapBuilder {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

impl Default for MarkerMapBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl ArtifactBuilder for MarkerMapBuilder {
    fn build(&self, launches: &LaunchSet, now: DateTime<Utc>) -> Result<LaunchMap, ArtifactError> {
        if !(-90.0..=90.0).contains(&self.center.latitude)
            || !(-180.0..=180.0).contains(&self.center.longitude)
        {
            return Err(ArtifactError::InvalidConfig(format!(
                "center ({}, {}) out of range",
                self.center.latitude, self.center.longitude
            )));
        }

        let markers = launches
            .iter()
            .enumerate()
            .map(|(index, launch)| {
                let next = index == 0;
                MapMarker {
                    launch_id: launch.id.clone(),
                    position: GeoPoint::new(launch.latitude, launch.longitude),
                    popup: format!(
                        "Mission: {}<br>Pad: {}<br>Countdown: {}",
                        escape_html(&launch.mission),
                        escape_html(&launch.pad),
                        Countdown::between(launch.net, now)
                    ),
                    color: if next { MarkerColor::Green } else { MarkerColor::Red },
                    icon: MARKER_ICON.to_string(),
                    next,
                }
            })
            .collect();

        Ok(LaunchMap {
            center: self.center,
            zoom: self.zoom,
            markers,
        })
    }
}

/// Minimal HTML escaping for provider-controlled text.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
