//! The shared slot holding the current published snapshot.
//!
//! [`snapshot_store`] hands out exactly one [`SnapshotWriter`] and a cloneable
//! [`SnapshotReader`]. Publishing swaps an `Arc<Snapshot>` under a write lock
//! held only for the pointer swap; readers clone the `Arc` under a read lock
//! and keep their copy for as long as they like, unaffected by later swaps.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::models::Snapshot;

struct Shared {
    current: RwLock<Option<Arc<Snapshot>>>,
}

/// Create a new, empty store.
pub fn snapshot_store() -> (SnapshotWriter, SnapshotReader) {
    let shared = Arc::new(Shared {
        current: RwLock::new(None),
    });
    let (updates, generations) = watch::channel(0);

    (
        SnapshotWriter {
            shared: Arc::clone(&shared),
            updates,
        },
        SnapshotReader {
            shared,
            generations,
        },
    )
}

/// Sole publisher of snapshots. Deliberately not `Clone`.
pub struct SnapshotWriter {
    shared: Arc<Shared>,
    updates: watch::Sender<u64>,
}

impl SnapshotWriter {
    /// Publish `snapshot` as the next generation and return the shared handle.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let published = {
            let mut slot = self.shared.current.write();
            let generation = slot.as_ref().map_or(0, |s| s.generation()) + 1;
            let published = Arc::new(snapshot.with_generation(generation));
            *slot = Some(Arc::clone(&published));
            published
        };

        // Notify after the lock is released; a lagging receiver only ever
        // sees the latest generation.
        self.updates.send_replace(published.generation());
        published
    }

    /// The snapshot this writer published last.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.shared.current.read().clone()
    }

    /// A fresh reader for this store.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            shared: Arc::clone(&self.shared),
            generations: self.updates.subscribe(),
        }
    }
}

/// Read-only handle to the store.
#[derive(Clone)]
pub struct SnapshotReader {
    shared: Arc<Shared>,
    generations: watch::Receiver<u64>,
}

impl SnapshotReader {
    /// The latest published snapshot, or `None` before the first publish.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.shared.current.read().clone()
    }

    /// Generation of the latest snapshot, 0 before the first publish.
    pub fn generation(&self) -> u64 {
        *self.generations.borrow()
    }

    /// Receiver that changes whenever a new generation is published.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generations.clone()
    }
}

impl std::fmt::Debug for SnapshotReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotReader")
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, LaunchMap, LaunchSet};
    use chrono::Utc;

    fn empty_snapshot() -> Snapshot {
        let map = LaunchMap {
            center: GeoPoint::new(0.0, 0.0),
            zoom: 1,
            markers: vec![],
        };
        Snapshot::new(LaunchSet::empty(), map, Utc::now())
    }

    #[test]
    fn test_absent_before_first_publish() {
        let (_writer, reader) = snapshot_store();
        assert!(reader.current().is_none());
        assert_eq!(reader.generation(), 0);
    }

    #[test]
    fn test_generations_increase() {
        let (writer, reader) = snapshot_store();

        let first = writer.publish(empty_snapshot());
        let second = writer.publish(empty_snapshot());

        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);
        assert_eq!(reader.current().unwrap().generation(), 2);
        assert_eq!(reader.generation(), 2);
    }

    #[test]
    fn test_held_snapshot_survives_replacement() {
        let (writer, reader) = snapshot_store();
        writer.publish(empty_snapshot());

        let held = reader.current().unwrap();
        writer.publish(empty_snapshot());

        assert_eq!(held.generation(), 1);
        assert_eq!(reader.current().unwrap().generation(), 2);
    }

    #[test]
    fn test_reader_from_writer_sees_publishes() {
        let (writer, _reader) = snapshot_store();
        let late = writer.reader();
        writer.publish(empty_snapshot());
        assert_eq!(late.current().unwrap().generation(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_wakes_on_publish() {
        let (writer, reader) = snapshot_store();
        let mut rx = reader.subscribe();

        writer.publish(empty_snapshot());

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
    }
}
