// src/core/storage/snapshot.rs

//! A versioned, copy-on-write snapshot cache.
//!
//! Readers that want to enumerate the store grab an immutable snapshot
//! instead of holding the store's lock for the whole formatting pass. The
//! cache copies the live map at most once per version bump, no matter how
//! many readers race for it.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// The immutable point-in-time view handed out to readers.
pub type Snapshot = Arc<BTreeMap<u64, i64>>;

/// Caches the most recent snapshot alongside the version it was taken at.
///
/// `data_version` is bumped by every successful store mutation; the cached
/// snapshot is valid while `snapshot_version` still matches it. The refresh
/// path is double-checked under the cache mutex so concurrent readers after
/// a write trigger exactly one copy.
#[derive(Debug)]
pub struct SnapshotCache {
    cached: Mutex<Option<Snapshot>>,
    data_version: AtomicU64,
    snapshot_version: AtomicU64,
    refresh_count: AtomicU64,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
            data_version: AtomicU64::new(0),
            // Starts stale so the first read populates the cache.
            snapshot_version: AtomicU64::new(u64::MAX),
            refresh_count: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot whose contents equal `live`. The caller must hold
    /// the store's read lock for the duration of the call, which pins the
    /// version captured here to the data being copied.
    pub fn get(&self, live: &BTreeMap<u64, i64>) -> Snapshot {
        // Fast path: no exclusive locking beyond the pointer clone.
        if !self.is_stale() {
            if let Some(snapshot) = self.cached.lock().as_ref() {
                return snapshot.clone();
            }
        }

        let mut cached = self.cached.lock();
        // Double-check after acquiring the lock; another reader may have
        // refreshed while we waited.
        match cached.as_ref() {
            Some(snapshot) if !self.is_stale() => snapshot.clone(),
            _ => {
                let version = self.data_version.load(Ordering::Acquire);
                debug!("Creating new snapshot with {} items", live.len());
                let snapshot: Snapshot = Arc::new(live.clone());
                *cached = Some(snapshot.clone());
                self.snapshot_version.store(version, Ordering::Release);
                self.refresh_count.fetch_add(1, Ordering::Relaxed);
                snapshot
            }
        }
    }

    /// Marks the cached snapshot stale. Called after every successful store
    /// mutation.
    pub fn bump_version(&self) {
        let version = self.data_version.fetch_add(1, Ordering::Release) + 1;
        debug!("Data version incremented to {version}");
    }

    /// The current data version.
    pub fn data_version(&self) -> u64 {
        self.data_version.load(Ordering::Acquire)
    }

    /// True while no snapshot matching the current data version exists.
    pub fn is_stale(&self) -> bool {
        self.snapshot_version.load(Ordering::Acquire) != self.data_version.load(Ordering::Acquire)
    }

    /// How many full copies have been made so far. Observable so tests can
    /// assert the one-copy-per-version property.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count.load(Ordering::Relaxed)
    }
}
