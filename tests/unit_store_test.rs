// tests/unit_store_test.rs

use numset::core::NumsetError;
use numset::core::storage::NumberStore;

#[test]
fn test_insert_records_current_timestamp() {
    let store = NumberStore::new();
    let before = chrono::Utc::now().timestamp();

    let timestamp = store.insert(42).unwrap();

    assert!(timestamp >= before);
    assert!(store.contains(42));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_insert_duplicate_fails_and_preserves_entry() {
    let store = NumberStore::new();
    let original = store.insert(7).unwrap();

    let err = store.insert(7).unwrap_err();
    assert!(matches!(err, NumsetError::DuplicateNumber));

    // The existing entry, including its timestamp, is unchanged.
    let snapshot = store.snapshot();
    assert_eq!(snapshot.get(&7), Some(&original));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_remove_returns_insertion_timestamp() {
    let store = NumberStore::new();
    let inserted_at = store.insert(9).unwrap();

    let removed_at = store.remove(9).unwrap();
    assert_eq!(removed_at, inserted_at);
    assert!(!store.contains(9));

    let err = store.remove(9).unwrap_err();
    assert!(matches!(err, NumsetError::NotFound));
}

#[test]
fn test_clear_returns_prior_count() {
    let store = NumberStore::new();
    for n in [3, 1, 2] {
        store.insert(n).unwrap();
    }

    assert_eq!(store.clear(), 3);
    assert!(store.is_empty());

    // Clearing an empty store succeeds and reports zero.
    assert_eq!(store.clear(), 0);
}

#[test]
fn test_uniqueness_invariant_over_mixed_operations() {
    let store = NumberStore::new();
    store.insert(1).unwrap();
    store.insert(2).unwrap();
    assert!(store.insert(1).is_err());
    store.remove(1).unwrap();
    store.insert(1).unwrap();
    assert!(store.insert(1).is_err());

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), store.len());
    assert_eq!(snapshot.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn test_snapshot_enumerates_in_ascending_order() {
    let store = NumberStore::new();
    for n in [5, 1, 9] {
        store.insert(n).unwrap();
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.keys().copied().collect::<Vec<_>>(), vec![1, 5, 9]);
}

#[test]
fn test_version_bumps_only_on_successful_mutation() {
    let store = NumberStore::new();
    assert_eq!(store.version(), 0);

    store.insert(1).unwrap();
    assert_eq!(store.version(), 1);

    // A failed insert is not a mutation.
    assert!(store.insert(1).is_err());
    assert_eq!(store.version(), 1);

    store.remove(1).unwrap();
    assert_eq!(store.version(), 2);

    assert!(store.remove(1).is_err());
    assert_eq!(store.version(), 2);

    store.clear();
    assert_eq!(store.version(), 3);
}
