//! Validates and heals a loaded tree.
//!
//! The persisted value is user-reachable storage and may contain anything:
//! nothing at all, a scalar, an incompatible older format, or a tree with
//! missing or wrongly-typed fields. `repair` normalizes all of that into a
//! well-formed [`Root`], preferring silent self-healing over user-facing
//! failure. Unrecoverable input is discarded and replaced with a default
//! three-folder tree.
//!
//! Repair is idempotent: running it on its own output reports `changed=false`
//! and returns an identical tree.

use serde_json::{json, Map, Value};

use crate::tree::{codec, id};
use crate::types::node::{
    Folder, Node, NodeKind, Root, DEFAULT_FOLDER_TITLES, FALLBACK_BOOKMARK_TITLE,
    FALLBACK_FOLDER_TITLE, PLACEHOLDER_URL, ROOT_ID, ROOT_TITLE,
};

/// Keys that identify the incompatible pre-tree storage format. A value that
/// lacks the current-format markers but carries any of these is discarded
/// wholesale rather than partially migrated.
const LEGACY_KEYS: [&str; 3] = ["bookmarks", "folders", "version"];

const VALID_KINDS: [&str; 3] = ["folder", "bookmark", "note"];

/// Result of a repair pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub root: Root,
    /// At least one field was healed. The caller persists iff this is set.
    pub changed: bool,
    /// The candidate was unusable and a default tree was built instead.
    pub recreated: bool,
}

/// Builds the default tree: a root with three empty folders.
pub fn default_root() -> Root {
    Root {
        id: ROOT_ID.to_string(),
        title: ROOT_TITLE.to_string(),
        kind: NodeKind::Folder,
        children: DEFAULT_FOLDER_TITLES
            .iter()
            .map(|title| {
                Node::Folder(Folder {
                    id: id::generate(),
                    title: (*title).to_string(),
                    children: Vec::new(),
                    icon: None,
                })
            })
            .collect(),
    }
}

/// Normalizes a raw persisted candidate into a well-formed tree.
///
/// `None` stands for "nothing stored" (including unparseable storage text).
pub fn repair(candidate: Option<Value>) -> RepairOutcome {
    // Absence check: anything that is not an object is unrecoverable, and an
    // object with no keys carries nothing worth preserving.
    let mut map = match candidate {
        Some(Value::Object(map)) if map.is_empty() => {
            log::info!("persisted tree is an empty object, creating default");
            return recreate();
        }
        Some(Value::Object(map)) => map,
        Some(other) => {
            log::warn!("persisted tree is not an object ({:?}), recreating", kind_name(&other));
            return recreate();
        }
        None => {
            log::info!("no persisted tree, creating default");
            return recreate();
        }
    };

    // Legacy-format check: no current markers plus old-format keys means an
    // incompatible shape. Partial migration risks corrupting data silently,
    // so the whole value is discarded.
    if !has_format_markers(&map) && LEGACY_KEYS.iter().any(|key| map.contains_key(*key)) {
        log::warn!("persisted tree is in an incompatible legacy format, recreating");
        return recreate();
    }

    let mut changed = false;

    // Root field healing.
    if !is_nonempty_string(map.get("id")) {
        map.insert("id".to_string(), json!(ROOT_ID));
        changed = true;
    }
    if !matches!(map.get("type"), Some(Value::String(s)) if s == "folder") {
        map.insert("type".to_string(), json!("folder"));
        changed = true;
    }
    if !is_nonempty_string(map.get("title")) {
        map.insert("title".to_string(), json!(ROOT_TITLE));
        changed = true;
    }
    if !matches!(map.get("children"), Some(Value::Array(_))) {
        map.insert("children".to_string(), json!([]));
        changed = true;
    }

    if let Some(Value::Array(children)) = map.get_mut("children") {
        // Never leave a root with zero children.
        if children.is_empty() {
            for title in DEFAULT_FOLDER_TITLES {
                children.push(json!({
                    "id": id::generate(),
                    "title": title,
                    "type": "folder",
                    "children": [],
                }));
            }
            changed = true;
        }
        heal_children(children, &mut changed);

        // Never leave a root with zero folders: healing may have turned every
        // surviving child into a bookmark or note.
        if !children.iter().any(is_folder_value) {
            for title in DEFAULT_FOLDER_TITLES {
                children.push(json!({
                    "id": id::generate(),
                    "title": title,
                    "type": "folder",
                    "children": [],
                }));
            }
            changed = true;
        }
    }

    match codec::decode(Some(&Value::Object(map))) {
        Ok(root) => RepairOutcome {
            root,
            changed,
            recreated: false,
        },
        Err(err) => {
            // Healing guarantees decodability; this branch only fires if the
            // two ever drift apart.
            log::warn!("healed tree still undecodable ({}), recreating", err);
            recreate()
        }
    }
}

fn recreate() -> RepairOutcome {
    RepairOutcome {
        root: default_root(),
        changed: true,
        recreated: true,
    }
}

/// Whether a value carries the markers of the current tree format:
/// an id, `type == "folder"`, a title and an array of children.
fn has_format_markers(map: &Map<String, Value>) -> bool {
    map.contains_key("id")
        && matches!(map.get("type"), Some(Value::String(s)) if s == "folder")
        && map.contains_key("title")
        && matches!(map.get("children"), Some(Value::Array(_)))
}

/// Depth-first healing over a children array, mutating in place.
fn heal_children(children: &mut Vec<Value>, changed: &mut bool) {
    let mut i = 0;
    while i < children.len() {
        match children[i].as_object_mut() {
            Some(node) => {
                heal_node(node, changed);
                if let Some(Value::Array(grandchildren)) = node.get_mut("children") {
                    heal_children(grandchildren, changed);
                }
                i += 1;
            }
            None => {
                // Entries that are not objects are unrecoverable.
                children.remove(i);
                *changed = true;
            }
        }
    }
}

/// Heals a single node in place (without recursing into its children).
fn heal_node(node: &mut Map<String, Value>, changed: &mut bool) {
    if !is_nonempty_string(node.get("id")) {
        node.insert("id".to_string(), json!(id::generate()));
        *changed = true;
    }

    // Kind inference from shape: url-presence wins over children-presence,
    // and everything else falls back to folder.
    if !is_valid_kind(node.get("type")) {
        let inferred = if node.contains_key("url") {
            "bookmark"
        } else {
            "folder"
        };
        node.insert("type".to_string(), json!(inferred));
        *changed = true;
    }

    let kind = node
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("folder")
        .to_string();

    match kind.as_str() {
        "folder" => {
            if !matches!(node.get("children"), Some(Value::Array(_))) {
                node.insert("children".to_string(), json!([]));
                *changed = true;
            }
            drop_unless_string(node, "icon", changed);
        }
        "bookmark" => {
            if !is_string(node.get("url")) {
                node.insert("url".to_string(), json!(PLACEHOLDER_URL));
                *changed = true;
            }
            drop_unless_string(node, "favicon", changed);
            drop_unless_integer(node, "addedAt", changed);
        }
        _ => {
            if !is_string(node.get("content")) {
                node.insert("content".to_string(), json!(""));
                *changed = true;
            }
            drop_unless_integer(node, "createdAt", changed);
            drop_unless_integer(node, "editedAt", changed);
        }
    }

    if !is_nonempty_string(node.get("title")) {
        let fallback = if kind == "folder" {
            FALLBACK_FOLDER_TITLE
        } else {
            FALLBACK_BOOKMARK_TITLE
        };
        node.insert("title".to_string(), json!(fallback));
        *changed = true;
    }
}

fn is_folder_value(value: &Value) -> bool {
    matches!(value.get("type"), Some(Value::String(s)) if s == "folder")
}

fn is_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(_)))
}

fn is_nonempty_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.is_empty())
}

fn is_valid_kind(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if VALID_KINDS.contains(&s.as_str()))
}

/// Removes an optional field whose value is present but not a string.
fn drop_unless_string(node: &mut Map<String, Value>, key: &str, changed: &mut bool) {
    if node.contains_key(key) && !is_string(node.get(key)) {
        node.remove(key);
        *changed = true;
    }
}

/// Removes an optional timestamp field whose value is not an integer.
fn drop_unless_integer(node: &mut Map<String, Value>, key: &str, changed: &mut bool) {
    if let Some(value) = node.get(key) {
        if value.as_i64().is_none() {
            node.remove(key);
            *changed = true;
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
