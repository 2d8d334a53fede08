//! Refresh scheduler: startup retry, periodic refresh and atomic publish.
//!
//! # Lifecycle
//!
//! ```text
//! RefreshScheduler ──initialize()──► ReadyScheduler ──spawn()──► background loop
//!        │
//!        └── retry budget spent ──► StartupError (no loop, nothing published)
//! ```
//!
//! A cycle is `fetch → transform → build → publish`, run sequentially and
//! never overlapped with itself. No lock is held while fetching, transforming
//! or building; only the final pointer swap in the store is exclusive.

use std::sync::Arc;

use log::{error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::clock::{Clock, SystemClock};
use super::error::{RefreshError, StartupError};
use super::monitor::{SchedulerMonitor, SchedulerState};
use super::policy::RefreshPolicy;
use super::store::{SnapshotReader, SnapshotWriter};
use crate::models::Snapshot;
use crate::services::{transform_with_report, ArtifactBuilder};
use crate::source::{LaunchSource, SourceError};

/// Everything a refresh cycle needs. Owned by exactly one scheduler.
struct Pipeline {
    source: Arc<dyn LaunchSource>,
    builder: Arc<dyn ArtifactBuilder>,
    writer: SnapshotWriter,
    clock: Arc<dyn Clock>,
    policy: RefreshPolicy,
    monitor: Arc<SchedulerMonitor>,
}

impl Pipeline {
    async fn run_cycle(&self) -> Result<Arc<Snapshot>, RefreshError> {
        let raw = match time::timeout(self.policy.fetch_timeout, self.source.fetch()).await {
            Ok(result) => result?,
            Err(_) => return Err(SourceError::Timeout(self.policy.fetch_timeout).into()),
        };

        let now = self.clock.now();
        let (launches, report) = transform_with_report(&raw, now, self.policy.window);
        if !report.rejected.is_empty() {
            warn!(
                "Dropped {} of {} launch records that could not be normalized",
                report.rejected.len(),
                raw.len()
            );
        }

        let launches = match self.policy.max_launches {
            Some(limit) if limit > 0 => launches.truncated(limit),
            _ => launches,
        };

        let map = self.builder.build(&launches, now)?;
        let snapshot = Snapshot::new(launches, map, self.clock.now());

        let unchanged = self
            .writer
            .current()
            .is_some_and(|previous| previous.fingerprint() == snapshot.fingerprint());
        let published = self.writer.publish(snapshot);
        self.monitor.record_success(published.generated_at(), unchanged);

        info!(
            "Published snapshot generation {} with {} launches{}",
            published.generation(),
            published.launches().len(),
            if unchanged { " (content unchanged)" } else { "" }
        );
        Ok(published)
    }
}

/// A scheduler that has not published anything yet.
pub struct RefreshScheduler {
    pipeline: Pipeline,
}

impl RefreshScheduler {
    pub fn new(
        source: Arc<dyn LaunchSource>,
        builder: Arc<dyn ArtifactBuilder>,
        writer: SnapshotWriter,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            pipeline: Pipeline {
                source,
                builder,
                writer,
                clock: Arc::new(SystemClock),
                policy,
                monitor: Arc::new(SchedulerMonitor::new()),
            },
        }
    }

    /// Replace the wall clock used for windows and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.pipeline.clock = clock;
        self
    }

    pub fn monitor(&self) -> Arc<SchedulerMonitor> {
        Arc::clone(&self.pipeline.monitor)
    }

    pub fn reader(&self) -> SnapshotReader {
        self.pipeline.writer.reader()
    }

    /// Run cycles until one publishes, waiting the retry backoff between
    /// failures.
    ///
    /// Spending the whole retry budget leaves the monitor in
    /// [`SchedulerState::Failed`] and returns the last cycle error.
    pub async fn initialize(self) -> Result<ReadyScheduler, StartupError> {
        let retry = self.pipeline.policy.retry;
        let monitor = &self.pipeline.monitor;

        if retry.max_attempts == 0 {
            monitor.set_state(SchedulerState::Failed { attempts: 0 });
            return Err(StartupError::NoAttempts);
        }

        let mut attempt = 1;
        loop {
            monitor.set_state(SchedulerState::Retrying { attempt });
            monitor.record_startup_attempt();

            match self.pipeline.run_cycle().await {
                Ok(snapshot) => {
                    info!(
                        "Initial load succeeded on attempt {}/{} (generation {})",
                        attempt,
                        retry.max_attempts,
                        snapshot.generation()
                    );
                    monitor.set_state(SchedulerState::Ready);
                    return Ok(ReadyScheduler {
                        pipeline: self.pipeline,
                    });
                }
                Err(e) => {
                    monitor.record_startup_failure(self.pipeline.clock.now(), &e.to_string());

                    if attempt >= retry.max_attempts {
                        error!(
                            "Initial load failed after {} attempts, giving up: {}",
                            attempt, e
                        );
                        monitor.set_state(SchedulerState::Failed { attempts: attempt });
                        return Err(StartupError::RetriesExhausted {
                            attempts: attempt,
                            last: e,
                        });
                    }

                    let delay = retry.delay_after(attempt);
                    warn!(
                        "Initial load attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, retry.max_attempts, e, delay
                    );
                    time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// A scheduler with a published snapshot, ready to refresh it periodically.
pub struct ReadyScheduler {
    pipeline: Pipeline,
}

impl ReadyScheduler {
    pub fn monitor(&self) -> Arc<SchedulerMonitor> {
        Arc::clone(&self.pipeline.monitor)
    }

    pub fn reader(&self) -> SnapshotReader {
        self.pipeline.writer.reader()
    }

    /// Run one steady-state cycle.
    ///
    /// Failures are logged and counted, never propagated: the previous
    /// snapshot stays published and the next tick is the retry.
    pub async fn tick(&self) -> Option<Arc<Snapshot>> {
        let monitor = &self.pipeline.monitor;
        monitor.set_state(SchedulerState::Refreshing);

        let outcome = match self.pipeline.run_cycle().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                let streak = monitor.record_failure(self.pipeline.clock.now(), &e.to_string());
                if streak >= self.pipeline.policy.alert_threshold {
                    error!(
                        "Refresh failed ({} consecutive failures), keeping previous snapshot: {}",
                        streak, e
                    );
                } else {
                    warn!("Refresh failed, keeping previous snapshot: {}", e);
                }
                None
            }
        };

        monitor.set_state(SchedulerState::Ready);
        outcome
    }

    /// Refresh forever. The interval is measured from the end of each cycle.
    pub async fn run(self) {
        let period = self.pipeline.policy.interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Background refresh running every {:?}", period);
        loop {
            ticker.tick().await;
            self.tick().await;
            ticker.reset();
        }
    }

    /// Run the refresh loop on a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
