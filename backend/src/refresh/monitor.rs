//! Observable scheduler state and refresh counters.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Lifecycle of the refresh scheduler.
///
/// `Uninitialized → Retrying → Ready ⇄ Refreshing`, or
/// `Retrying → Failed` once the startup budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SchedulerState {
    Uninitialized,
    Retrying { attempt: u32 },
    Ready,
    Refreshing,
    Failed { attempts: u32 },
}

impl SchedulerState {
    /// Whether a snapshot has been published and is being kept fresh.
    pub fn is_serving(&self) -> bool {
        matches!(self, SchedulerState::Ready | SchedulerState::Refreshing)
    }
}

/// Point-in-time copy of the refresh counters.
///
/// Startup attempts and their failures are counted apart from steady-state
/// refreshes; `last_error` and `last_failure_at` cover both phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshStats {
    pub startup_attempts: u64,
    pub startup_failures: u64,
    pub successful_refreshes: u64,
    pub failed_refreshes: u64,
    pub consecutive_failures: u64,
    pub unchanged_refreshes: u64,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct Timestamps {
    last_success_at: Option<DateTime<Utc>>,
    last_failure_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Shared between the scheduler (writer) and the HTTP layer (reader).
pub struct SchedulerMonitor {
    state: RwLock<SchedulerState>,
    startup_attempts: AtomicU64,
    startup_failures: AtomicU64,
    successful_refreshes: AtomicU64,
    failed_refreshes: AtomicU64,
    consecutive_failures: AtomicU64,
    unchanged_refreshes: AtomicU64,
    timestamps: RwLock<Timestamps>,
}

impl SchedulerMonitor {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SchedulerState::Uninitialized),
            startup_attempts: AtomicU64::new(0),
            startup_failures: AtomicU64::new(0),
            successful_refreshes: AtomicU64::new(0),
            failed_refreshes: AtomicU64::new(0),
            consecutive_failures: AtomicU64::new(0),
            unchanged_refreshes: AtomicU64::new(0),
            timestamps: RwLock::new(Timestamps::default()),
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.read()
    }

    pub(crate) fn set_state(&self, state: SchedulerState) {
        *self.state.write() = state;
    }

    pub(crate) fn record_startup_attempt(&self) {
        self.startup_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_success(&self, at: DateTime<Utc>, unchanged: bool) {
        self.successful_refreshes.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures.store(0, Ordering::Relaxed);
        if unchanged {
            self.unchanged_refreshes.fetch_add(1, Ordering::Relaxed);
        }
        self.timestamps.write().last_success_at = Some(at);
    }

    pub(crate) fn record_startup_failure(&self, at: DateTime<Utc>, error: &str) {
        self.startup_failures.fetch_add(1, Ordering::Relaxed);
        self.note_error(at, error);
    }

    /// Steady-state failure. Returns the consecutive failure count including
    /// this one.
    pub(crate) fn record_failure(&self, at: DateTime<Utc>, error: &str) -> u64 {
        self.failed_refreshes.fetch_add(1, Ordering::Relaxed);
        let consecutive = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        self.note_error(at, error);
        consecutive
    }

    fn note_error(&self, at: DateTime<Utc>, error: &str) {
        let mut timestamps = self.timestamps.write();
        timestamps.last_failure_at = Some(at);
        timestamps.last_error = Some(error.to_string());
    }

    pub fn stats(&self) -> RefreshStats {
        let timestamps = self.timestamps.read();
        RefreshStats {
            startup_attempts: self.startup_attempts.load(Ordering::Relaxed),
            startup_failures: self.startup_failures.load(Ordering::Relaxed),
            successful_refreshes: self.successful_refreshes.load(Ordering::Relaxed),
            failed_refreshes: self.failed_refreshes.load(Ordering::Relaxed),
            consecutive_failures: self.consecutive_failures.load(Ordering::Relaxed),
            unchanged_refreshes: self.unchanged_refreshes.load(Ordering::Relaxed),
            last_success_at: timestamps.last_success_at,
            last_failure_at: timestamps.last_failure_at,
            last_error: timestamps.last_error.clone(),
        }
    }
}

impl Default for SchedulerMonitor {
    fn default() -> Self {
        Self::new()
    }
}
