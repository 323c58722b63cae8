//! Unit tests for the key-value storage layer.
//!
//! The store is the stand-in for browser-local key-value storage: a single
//! table of opaque TEXT values addressed by namespaced keys.

use tempfile::TempDir;
use treemark::storage::{migrations, KvStore};

#[test]
fn get_absent_key_returns_none() {
    let kv = KvStore::open_in_memory().expect("Failed to open in-memory store");
    assert_eq!(kv.get("gh_bookmarks").unwrap(), None);
}

#[test]
fn set_then_get_round_trips() {
    let kv = KvStore::open_in_memory().unwrap();
    kv.set("gh_bookmarks", r#"{"id":"0"}"#).unwrap();
    assert_eq!(kv.get("gh_bookmarks").unwrap().as_deref(), Some(r#"{"id":"0"}"#));
}

#[test]
fn set_replaces_previous_value() {
    let kv = KvStore::open_in_memory().unwrap();
    kv.set("k", "first").unwrap();
    kv.set("k", "second").unwrap();
    assert_eq!(kv.get("k").unwrap().as_deref(), Some("second"));
}

#[test]
fn remove_deletes_value_and_is_idempotent() {
    let kv = KvStore::open_in_memory().unwrap();
    kv.set("k", "v").unwrap();
    kv.remove("k").unwrap();
    assert_eq!(kv.get("k").unwrap(), None);
    // Removing again is a no-op
    kv.remove("k").unwrap();
}

#[test]
fn keys_are_independent() {
    let kv = KvStore::open_in_memory().unwrap();
    kv.set("a", "1").unwrap();
    kv.set("b", "2").unwrap();
    kv.remove("a").unwrap();
    assert_eq!(kv.get("b").unwrap().as_deref(), Some("2"));
}

/// Values survive closing and reopening an on-disk store.
#[test]
fn values_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treemark.db");

    {
        let kv = KvStore::open(&path).expect("Failed to open on-disk store");
        kv.set("gh_bookmarks", "persisted").unwrap();
    }

    let kv = KvStore::open(&path).unwrap();
    assert_eq!(kv.get("gh_bookmarks").unwrap().as_deref(), Some("persisted"));
}

/// Opening the same store twice must not re-run migrations destructively.
#[test]
fn reopening_preserves_schema_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treemark.db");

    let _ = KvStore::open(&path).unwrap();
    let kv = KvStore::open(&path).unwrap();
    kv.set("k", "v").unwrap();
    assert_eq!(kv.get("k").unwrap().as_deref(), Some("v"));
    assert!(migrations::CURRENT_SCHEMA_VERSION >= 1);
}
