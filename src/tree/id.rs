//! Node id generation.
//!
//! Ids are a creation timestamp plus a random suffix. They are
//! collision-resistant within one tree's lifetime, not globally unique;
//! nothing in the engine depends on uniqueness beyond within-tree lookup.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

/// Returns the current UNIX timestamp in milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Generates a fresh node id: `<unix-millis>-<8 random hex chars>`.
pub fn generate() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now_millis(), &suffix[..8])
}
