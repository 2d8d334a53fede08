//! Refresh-and-publish core.
//!
//! The [`RefreshScheduler`] owns the only [`SnapshotWriter`]; request handlers
//! hold [`SnapshotReader`]s. Readers always see either nothing (before the
//! first publish) or one complete snapshot, and never an older generation
//! after a newer one.

pub mod clock;
pub mod error;
pub mod monitor;
pub mod policy;
pub mod scheduler;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use error::{RefreshError, StartupError};
pub use monitor::{RefreshStats, SchedulerMonitor, SchedulerState};
pub use policy::{RefreshPolicy, RetryPolicy};
pub use scheduler::{ReadyScheduler, RefreshScheduler};
pub use store::{snapshot_store, SnapshotReader, SnapshotWriter};
