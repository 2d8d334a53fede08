//! Launch Library client.
//!
//! One request per [`LaunchSource::fetch`] call, no internal retry. Retry and
//! cadence belong to the refresh scheduler.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use super::error::{SourceError, SourceResult};
use super::wire::parse_upcoming_launches;
use super::LaunchSource;
use crate::models::RawLaunch;

/// Upcoming launches from Cape Canaveral (location id 12).
pub const DEFAULT_ENDPOINT: &str =
    "https://ll.thespacedevs.com/2.2.0/launch/upcoming/?format=json&location__ids=12";

const USER_AGENT: &str = concat!("launch-board/", env!("CARGO_PKG_VERSION"));

/// Longest error body excerpt kept in a [`SourceError::Status`].
const BODY_EXCERPT_LEN: usize = 500;

/// HTTP client for the Launch Library upcoming-launches endpoint.
#[derive(Debug, Clone)]
pub struct LaunchLibraryClient {
    client: reqwest::Client,
    endpoint: String,
}

impl LaunchLibraryClient {
    /// Build a client with connection pooling and a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LaunchSource for LaunchLibraryClient {
    async fn fetch(&self) -> SourceResult<Vec<RawLaunch>> {
        debug!("Fetching upcoming launches: {}", self.endpoint);

        let resp = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        let body = resp.text().await?;
        let launches = parse_upcoming_launches(&body)?;
        debug!("Fetched {} launch records", launches.len());
        Ok(launches)
    }
}
