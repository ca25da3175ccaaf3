// src/core/storage/store.rs

//! The authoritative set of number -> insertion-timestamp entries.

use super::snapshot::{Snapshot, SnapshotCache};
use crate::core::NumsetError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, info};

/// An ordered map of unique numbers to their insertion timestamps, safe for
/// concurrent use. Reads take the shared lock; mutations take the exclusive
/// lock only for the in-memory operation itself. Enumeration goes through
/// the [`SnapshotCache`] so slow readers never hold up writers.
#[derive(Debug, Default)]
pub struct NumberStore {
    numbers: RwLock<BTreeMap<u64, i64>>,
    snapshots: SnapshotCache,
}

impl NumberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `number` at the current Unix timestamp. Fails with
    /// `DuplicateNumber` if it is already present, leaving the existing
    /// entry untouched.
    pub fn insert(&self, number: u64) -> Result<i64, NumsetError> {
        // The timestamp is computed outside the write lock; the lock covers
        // only the map mutation.
        let timestamp = now_unix();
        let inserted = {
            let mut numbers = self.numbers.write();
            match numbers.entry(number) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(timestamp);
                    true
                }
            }
        };

        if !inserted {
            info!("Attempted to insert duplicate number: {number}");
            return Err(NumsetError::DuplicateNumber);
        }
        info!("Inserted number: {number} at timestamp: {timestamp}");
        self.snapshots.bump_version();
        Ok(timestamp)
    }

    /// Deletes `number`, returning its original insertion timestamp. Fails
    /// with `NotFound` if it is absent.
    pub fn remove(&self, number: u64) -> Result<i64, NumsetError> {
        let removed = self.numbers.write().remove(&number);

        let Some(timestamp) = removed else {
            info!("Attempted to delete non-existent number: {number}");
            return Err(NumsetError::NotFound);
        };
        info!("Deleted number: {number} (was inserted at timestamp: {timestamp})");
        self.snapshots.bump_version();
        Ok(timestamp)
    }

    /// Removes every entry unconditionally and returns the prior count.
    pub fn clear(&self) -> usize {
        let count = {
            let mut numbers = self.numbers.write();
            let count = numbers.len();
            numbers.clear();
            count
        };
        info!("Cleared all numbers (removed {count} entries)");
        self.snapshots.bump_version();
        count
    }

    pub fn len(&self) -> usize {
        self.numbers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.read().is_empty()
    }

    pub fn contains(&self, number: u64) -> bool {
        self.numbers.read().contains_key(&number)
    }

    /// Returns a consistent point-in-time view of the store, shared with
    /// every other reader at the same version.
    pub fn snapshot(&self) -> Snapshot {
        let numbers = self.numbers.read();
        let snapshot = self.snapshots.get(&numbers);
        debug!("Serving snapshot with {} entries", snapshot.len());
        snapshot
    }

    /// The current data version, bumped once per successful mutation.
    pub fn version(&self) -> u64 {
        self.snapshots.data_version()
    }

    /// The snapshot cache, exposed for tests asserting copy behavior.
    pub fn snapshot_cache(&self) -> &SnapshotCache {
        &self.snapshots
    }
}

/// Seconds since the Unix epoch.
fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
