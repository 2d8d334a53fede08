#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use launch_board::models::RawLaunch;
use launch_board::refresh::Clock;
use launch_board::source::{LaunchSource, SourceError, SourceResult};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// 2024-01-01T00:00:00Z, the reference "now" of most tests.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Clock frozen at a settable instant.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// A launch record with all required fields present.
pub fn raw_launch(id: &str, net: &str) -> RawLaunch {
    RawLaunch {
        id: id.to_string(),
        net: Some(net.to_string()),
        mission_name: Some(format!("Mission {}", id)),
        pad_latitude: Some(28.5618),
        pad_longitude: Some(-80.577),
        pad_name: Some("Space Launch Complex 40".to_string()),
        location_name: Some("Cape Canaveral, FL, USA".to_string()),
    }
}

/// `count` launches one day apart starting the day after [`epoch`].
pub fn daily_launches(count: u32) -> Vec<RawLaunch> {
    (1..=count)
        .map(|day| {
            let net = epoch() + chrono::Duration::days(i64::from(day));
            raw_launch(&format!("launch-{}", day), &net.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        })
        .collect()
}

enum Step {
    Fail,
    Succeed(Vec<RawLaunch>),
    Hang,
}

/// Source that replays a script of outcomes, then repeats the fallback.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Step>>,
    fallback: Mutex<Option<Vec<RawLaunch>>>,
    latency: Duration,
    calls: AtomicUsize,
}

impl ScriptedSource {
    /// Always returns `records`.
    pub fn succeeding(records: Vec<RawLaunch>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Some(records)),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with a transport error.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails `failures` times, then returns `records` forever.
    pub fn failing_first(failures: usize, records: Vec<RawLaunch>) -> Self {
        let source = Self::succeeding(records);
        source
            .script
            .lock()
            .unwrap()
            .extend((0..failures).map(|_| Step::Fail));
        source
    }

    /// Never answers.
    pub fn hanging() -> Self {
        let source = Self::failing();
        *source.script.lock().unwrap() = VecDeque::from([Step::Hang]);
        source
    }

    /// Every call takes `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replace what every later call returns; `None` makes it fail.
    pub fn set_fallback(&self, records: Option<Vec<RawLaunch>>) {
        *self.fallback.lock().unwrap() = records;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LaunchSource for ScriptedSource {
    async fn fetch(&self) -> SourceResult<Vec<RawLaunch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let step = self.script.lock().unwrap().pop_front();
        let step = step.unwrap_or_else(|| match self.fallback.lock().unwrap().clone() {
            Some(records) => Step::Succeed(records),
            None => Step::Fail,
        });

        match step {
            Step::Succeed(records) => Ok(records),
            Step::Fail => Err(SourceError::Transport("connection refused".to_string())),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
                Err(SourceError::Transport("hung".to_string()))
            }
        }
    }
}
