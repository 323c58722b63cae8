//! Treemark — the storage engine behind a bookmark-manager browser extension.
//!
//! Stores a tree of folders, bookmarks and rich-text notes as a single JSON
//! document in key-value storage, keeps it well-formed across uncontrolled
//! storage edits via an idempotent repair pass, and converts to/from the
//! Netscape bookmarks HTML format for import/export.
//!
//! UI layers (popup rendering, drag visuals, context menus) live outside this
//! crate and talk to it through [`managers::bookmark_store::BookmarkStoreTrait`].

pub mod managers;
pub mod services;
pub mod storage;
pub mod tree;
pub mod types;
