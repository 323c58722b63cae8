use std::fmt;

// === TreeError ===

/// Structural errors from tree mutation operations.
///
/// These are surfaced to the UI layer, which is responsible for user-visible
/// notification; they are never retried automatically. A failed operation
/// leaves the tree untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Node with the given ID was not found in the tree.
    NodeNotFound(String),
    /// The destination parent was not found.
    ParentNotFound(String),
    /// The destination exists but is not a folder.
    NotAFolder(String),
    /// The move would make a node its own ancestor.
    SelfMove(String),
    /// The reorder target sibling is missing (stale UI state).
    TargetNotFound(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::NodeNotFound(id) => write!(f, "Node not found: {}", id),
            TreeError::ParentNotFound(id) => write!(f, "Parent folder not found: {}", id),
            TreeError::NotAFolder(id) => write!(f, "Node is not a folder: {}", id),
            TreeError::SelfMove(id) => {
                write!(f, "Cannot move node into itself or its descendant: {}", id)
            }
            TreeError::TargetNotFound(id) => write!(f, "Reorder target not found: {}", id),
        }
    }
}

impl std::error::Error for TreeError {}

// === DecodeError ===

/// Structural recognition failures when decoding the persisted value.
///
/// Never surfaced past the store: repair absorbs both variants by healing or
/// recreating the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Nothing is stored under the tree's key.
    Absent,
    /// The stored value does not have the shape of a root folder.
    Malformed(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Absent => write!(f, "No persisted tree found"),
            DecodeError::Malformed(msg) => write!(f, "Malformed persisted tree: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}

// === StoreError ===

/// Errors from the bookmark store orchestrator.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying key-value storage operation failed.
    DatabaseError(String),
    /// Failed to serialize the tree for persistence.
    SerializationError(String),
    /// A tree mutation was rejected.
    Tree(TreeError),
    /// Recreating the tree after unrecoverable corruption failed. There is no
    /// deeper fallback.
    InitFailed(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Bookmark storage error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Bookmark serialization error: {}", msg)
            }
            StoreError::Tree(err) => write!(f, "{}", err),
            StoreError::InitFailed(msg) => {
                write!(f, "Bookmark store initialization failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<TreeError> for StoreError {
    fn from(err: TreeError) -> Self {
        StoreError::Tree(err)
    }
}
