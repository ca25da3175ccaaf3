// tests/unit_snapshot_test.rs

use numset::core::storage::NumberStore;
use std::sync::Arc;
use std::thread;

#[test]
fn test_snapshot_is_reused_while_version_unchanged() {
    let store = NumberStore::new();
    store.insert(1).unwrap();
    store.insert(2).unwrap();

    let first = store.snapshot();
    let second = store.snapshot();

    // Same Arc, no second copy.
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.snapshot_cache().refresh_count(), 1);
}

#[test]
fn test_write_invalidates_snapshot() {
    let store = NumberStore::new();
    store.insert(1).unwrap();

    let stale = store.snapshot();
    store.insert(2).unwrap();
    let fresh = store.snapshot();

    assert!(!Arc::ptr_eq(&stale, &fresh));
    // The old snapshot still reflects its own point in time.
    assert_eq!(stale.len(), 1);
    assert_eq!(fresh.len(), 2);
    assert_eq!(store.snapshot_cache().refresh_count(), 2);
}

#[test]
fn test_at_most_one_copy_per_version_under_concurrent_readers() {
    let store = Arc::new(NumberStore::new());
    for n in 1..=100 {
        store.insert(n).unwrap();
    }

    let readers: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = store.snapshot();
                    assert_eq!(snapshot.len(), 100);
                }
            })
        })
        .collect();
    for reader in readers {
        reader.join().unwrap();
    }

    // 100 inserts and no reads in between: all concurrent readers share
    // a single copy.
    assert_eq!(store.snapshot_cache().refresh_count(), 1);
}

#[test]
fn test_copies_bounded_by_version_bumps_with_interleaved_writes() {
    let store = Arc::new(NumberStore::new());
    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for n in 1..=50 {
                store.insert(n).unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let _ = store.snapshot();
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    // Number of full copies never exceeds the number of distinct versions
    // observed (the initial empty version included).
    assert!(store.snapshot_cache().refresh_count() <= store.version() + 1);
}

#[test]
fn test_reads_do_not_bump_version() {
    let store = NumberStore::new();
    store.insert(5).unwrap();
    let version = store.version();

    let _ = store.snapshot();
    let _ = store.contains(5);
    let _ = store.len();

    assert_eq!(store.version(), version);
}
