//! Read-only projections over the current snapshot.
//!
//! Every method reads the store once, so the values it returns all come from
//! the same generation. Nothing here caches.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{Countdown, Launch, Snapshot};
use crate::refresh::{Clock, SnapshotReader, SystemClock};

/// The next launch together with its countdown and the snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub struct NextLaunch {
    pub launch: Launch,
    pub countdown: Countdown,
    pub generation: u64,
    pub last_refresh: DateTime<Utc>,
}

#[derive(Clone)]
pub struct LaunchQuery {
    reader: SnapshotReader,
    clock: Arc<dyn Clock>,
}

impl LaunchQuery {
    pub fn new(reader: SnapshotReader) -> Self {
        Self {
            reader,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.reader.current()
    }

    pub fn next_launch(&self) -> Option<Launch> {
        self.current()?.launches().first().cloned()
    }

    pub fn last_refresh_time(&self) -> Option<DateTime<Utc>> {
        self.current().map(|s| s.generated_at())
    }

    /// Next launch with a countdown from the current instant.
    pub fn next_launch_countdown(&self) -> Option<NextLaunch> {
        let snapshot = self.current()?;
        let launch = snapshot.launches().first()?.clone();
        Some(NextLaunch {
            countdown: Countdown::between(launch.net, self.clock.now()),
            launch,
            generation: snapshot.generation(),
            last_refresh: snapshot.generated_at(),
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn reader(&self) -> &SnapshotReader {
        &self.reader
    }
}
