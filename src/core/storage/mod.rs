// src/core/storage/mod.rs

//! The in-memory number store and its versioned snapshot cache.

pub mod snapshot;
pub mod store;

pub use snapshot::SnapshotCache;
pub use store::NumberStore;
