//! Key-value persistence primitive.
//!
//! The browser extension keeps its tree in browser-local key-value storage;
//! this layer models that primitive as a single-table SQLite store with
//! get/set/remove on namespaced TEXT keys.
//!
//! # Usage
//!
//! ```no_run
//! use treemark::storage::KvStore;
//!
//! // Open a persistent store
//! let kv = KvStore::open("treemark.db").expect("failed to open store");
//!
//! // Or use an in-memory store for testing
//! let kv = KvStore::open_in_memory().expect("failed to open in-memory store");
//!
//! let _ = kv.set("gh_bookmarks", "{}");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::KvStore;
