//! Service configuration.
//!
//! Settings come from an optional TOML file, then environment overrides.
//! Every field has a default, so an absent file yields a working setup.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [source]
//! endpoint = "https://ll.thespacedevs.com/2.2.0/launch/upcoming/?format=json&location__ids=12"
//! timeout_secs = 30
//!
//! [refresh]
//! interval_secs = 300
//! startup_attempts = 5
//! startup_backoff_secs = 5
//! filter_window_days = 30
//! max_launches = 8
//!
//! [map]
//! center_latitude = 28.4555
//! center_longitude = -80.5287
//! zoom = 10
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::models::GeoPoint;
use crate::refresh::{RefreshPolicy, RetryPolicy};
use crate::services::launch_map::{DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::source::DEFAULT_ENDPOINT;

/// Upper bound on `refresh.filter_window_days` (ten years).
pub const MAX_FILTER_WINDOW_DAYS: i64 = 3650;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "LAUNCH_BOARD_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub map: MapSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds between automatic page reloads in the browser.
    #[serde(default = "default_page_refresh_secs")]
    pub page_refresh_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout for the upstream fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_startup_attempts")]
    pub startup_attempts: u32,
    #[serde(default = "default_startup_backoff_secs")]
    pub startup_backoff_secs: u64,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
    #[serde(default = "default_filter_window_days")]
    pub filter_window_days: i64,
    /// 0 disables the limit.
    #[serde(default = "default_max_launches")]
    pub max_launches: usize,
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_page_refresh_secs() -> u64 {
    300
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_interval_secs() -> u64 {
    300
}

fn default_startup_attempts() -> u32 {
    5
}

fn default_startup_backoff_secs() -> u64 {
    5
}

fn default_backoff_factor() -> f64 {
    1.0
}

fn default_max_backoff_secs() -> u64 {
    60
}

fn default_filter_window_days() -> i64 {
    crate::services::FILTER_WINDOW_DAYS
}

fn default_max_launches() -> usize {
    8
}

fn default_alert_threshold() -> u64 {
    3
}

fn default_center_latitude() -> f64 {
    DEFAULT_CENTER.latitude
}

fn default_center_longitude() -> f64 {
    DEFAULT_CENTER.longitude
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            page_refresh_secs: default_page_refresh_secs(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            startup_attempts: default_startup_attempts(),
            startup_backoff_secs: default_startup_backoff_secs(),
            backoff_factor: default_backoff_factor(),
            max_backoff_secs: default_max_backoff_secs(),
            filter_window_days: default_filter_window_days(),
            max_launches: default_max_launches(),
            alert_threshold: default_alert_threshold(),
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            zoom: default_zoom(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from `LAUNCH_BOARD_CONFIG` or the first standard location that
    /// exists, apply environment overrides, and validate.
    ///
    /// Searches for `launch-board.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::from_default_location()?,
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("launch-board.toml"),
            PathBuf::from("backend/launch-board.toml"),
            PathBuf::from("../launch-board.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Apply overrides from the environment.
    ///
    /// # Environment Variables
    /// - `HOST`, `PORT`: bind address
    /// - `LAUNCH_SOURCE_URL`: upstream endpoint
    /// - `FETCH_TIMEOUT_SECS`: upstream request timeout
    /// - `REFRESH_INTERVAL_SECS`: steady-state refresh period
    /// - `STARTUP_ATTEMPTS`, `STARTUP_BACKOFF_SECS`: initial load retry budget
    /// - `FILTER_WINDOW_DAYS`: look-ahead horizon
    /// - `MAX_LAUNCHES`: launches kept per snapshot (0 = all)
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = env_string("HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("PORT")? {
            self.server.port = port;
        }
        if let Some(endpoint) = env_string("LAUNCH_SOURCE_URL") {
            self.source.endpoint = endpoint;
        }
        if let Some(timeout) = env_parse("FETCH_TIMEOUT_SECS")? {
            self.source.timeout_secs = timeout;
        }
        if let Some(interval) = env_parse("REFRESH_INTERVAL_SECS")? {
            self.refresh.interval_secs = interval;
        }
        if let Some(attempts) = env_parse("STARTUP_ATTEMPTS")? {
            self.refresh.startup_attempts = attempts;
        }
        if let Some(backoff) = env_parse("STARTUP_BACKOFF_SECS")? {
            self.refresh.startup_backoff_secs = backoff;
        }
        if let Some(days) = env_parse("FILTER_WINDOW_DAYS")? {
            self.refresh.filter_window_days = days;
        }
        if let Some(limit) = env_parse("MAX_LAUNCHES")? {
            self.refresh.max_launches = limit;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid("refresh.interval_secs must be > 0".into()));
        }
        if self.refresh.startup_attempts == 0 {
            return Err(ConfigError::Invalid("refresh.startup_attempts must be > 0".into()));
        }
        if !(1..=MAX_FILTER_WINDOW_DAYS).contains(&self.refresh.filter_window_days) {
            return Err(ConfigError::Invalid(format!(
                "refresh.filter_window_days must be between 1 and {}",
                MAX_FILTER_WINDOW_DAYS
            )));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be > 0".into()));
        }
        if !self.refresh.backoff_factor.is_finite() || self.refresh.backoff_factor < 1.0 {
            return Err(ConfigError::Invalid("refresh.backoff_factor must be >= 1.0".into()));
        }
        if !(-90.0..=90.0).contains(&self.map.center_latitude)
            || !(-180.0..=180.0).contains(&self.map.center_longitude)
        {
            return Err(ConfigError::Invalid("map center out of range".into()));
        }
        Ok(())
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        let refresh = &self.refresh;
        RefreshPolicy {
            interval: Duration::from_secs(refresh.interval_secs),
            fetch_timeout: Duration::from_secs(self.source.timeout_secs),
            window: window_days(refresh.filter_window_days),
            max_launches: (refresh.max_launches > 0).then_some(refresh.max_launches),
            alert_threshold: refresh.alert_threshold,
            retry: RetryPolicy {
                max_attempts: refresh.startup_attempts,
                backoff: Duration::from_secs(refresh.startup_backoff_secs),
                factor: refresh.backoff_factor,
                max_backoff: Duration::from_secs(refresh.max_backoff_secs),
            },
        }
    }

    pub fn map_center(&self) -> GeoPoint {
        GeoPoint::new(self.map.center_latitude, self.map.center_longitude)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Window for `days`, clamped to the accepted range so an unvalidated
/// config still yields a usable policy.
fn window_days(days: i64) -> chrono::Duration {
    let days = days.clamp(1, MAX_FILTER_WINDOW_DAYS);
    chrono::Duration::try_days(days)
        .unwrap_or_else(|| chrono::Duration::days(crate::services::FILTER_WINDOW_DAYS))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env_string(key) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: raw,
        }),
    }
}
