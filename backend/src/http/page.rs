//! Server-rendered HTML page.
//!
//! The page is a single self-contained document: a launch table whose
//! countdown spans tick client-side from their `data-launch-time`, and a
//! Leaflet map fed from the snapshot's serialized markers.

use chrono::{DateTime, Utc};

use crate::models::{Countdown, Snapshot};
use crate::services::escape_html;

pub const PAGE_TITLE: &str = "Upcoming Cape Canaveral Launches";
pub const LOADING_MESSAGE: &str = "Loading data... Please refresh in a moment.";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; }
table { border-collapse: collapse; margin-bottom: 1.5rem; }
th, td { border: 1px solid #ccc; padding: 0.4rem 0.8rem; text-align: left; }
tr.next { background: #e7f7e7; }
#map { height: 480px; }
"#;

const COUNTDOWN_SCRIPT: &str = r#"
function formatCountdown(ms) {
  const sign = ms < 0 ? "-" : "";
  let s = Math.floor(Math.abs(ms) / 1000);
  const d = Math.floor(s / 86400); s %= 86400;
  const h = Math.floor(s / 3600); s %= 3600;
  const m = Math.floor(s / 60); s %= 60;
  return sign + d + "d " + h + "h " + m + "m " + s + "s";
}
function tick() {
  document.querySelectorAll("[data-launch-time]").forEach(function (el) {
    el.textContent = formatCountdown(Date.parse(el.dataset.launchTime) - Date.now());
  });
}
setInterval(tick, 1000);
"#;

const MAP_SCRIPT: &str = r#"
const map = L.map("map").setView([launchMap.center.latitude, launchMap.center.longitude], launchMap.zoom);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
launchMap.markers.forEach(function (m) {
  L.circleMarker([m.position.latitude, m.position.longitude], { color: m.color })
    .bindPopup(m.popup)
    .addTo(map);
});
"#;

/// Render the full page for `snapshot` with countdowns as of `now`.
pub fn render_page(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    refresh_secs: u64,
) -> Result<String, serde_json::Error> {
    // `</` inside a script block would close it early.
    let markers = serde_json::to_string(snapshot.map())?.replace("</", "<\\/");

    let mut rows = String::new();
    for (index, launch) in snapshot.launches().iter().enumerate() {
        let net = launch.net.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        rows.push_str(&format!(
            "<tr{class}><td>{mission}</td><td>{pad}</td><td>{location}</td><td>{net}</td>\
             <td><span data-launch-time=\"{net}\">{countdown}</span></td></tr>\n",
            class = if index == 0 { " class=\"next\"" } else { "" },
            mission = escape_html(&launch.mission),
            pad = escape_html(&launch.pad),
            location = escape_html(&launch.location),
            net = net,
            countdown = Countdown::between(launch.net, now),
        ));
    }
    if rows.is_empty() {
        rows.push_str("<tr><td colspan=\"5\">No launches scheduled in the window.</td></tr>\n");
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="{refresh_secs}">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>{style}</style>
</head>
<body>
<h1>{title}</h1>
<p>Data as of {generated_at} (generation {generation})</p>
<table>
<thead><tr><th>Mission</th><th>Pad</th><th>Location</th><th>Launch time (UTC)</th><th>Countdown</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<div id="map"></div>
<script>const launchMap = {markers};</script>
<script>{map_script}</script>
<script>{countdown_script}</script>
</body>
</html>
"#,
        refresh_secs = refresh_secs,
        title = PAGE_TITLE,
        style = STYLE,
        generated_at = snapshot.generated_at().format("%Y-%m-%d %H:%M:%S UTC"),
        generation = snapshot.generation(),
        rows = rows,
        markers = markers,
        map_script = MAP_SCRIPT,
        countdown_script = COUNTDOWN_SCRIPT,
    ))
}

/// Placeholder served before the first snapshot is published.
pub fn render_loading(refresh_secs: u64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="{refresh_secs}">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<p>{message}</p>
</body>
</html>
"#,
        refresh_secs = refresh_secs.min(10),
        title = PAGE_TITLE,
        message = LOADING_MESSAGE,
    )
}
