use serde::{Deserialize, Serialize};

/// Key under which the whole tree is persisted in key-value storage.
pub const STORAGE_KEY: &str = "gh_bookmarks";

/// Fixed id of the root node.
pub const ROOT_ID: &str = "0";

/// Fixed title of the root node.
pub const ROOT_TITLE: &str = "root";

/// Titles of the folders created when the tree is recreated from scratch.
pub const DEFAULT_FOLDER_TITLES: [&str; 3] = ["Избранное", "Работа", "Личное"];

/// Title synthesized for a folder that has none.
pub const FALLBACK_FOLDER_TITLE: &str = "Папка";

/// Title synthesized for a bookmark or note that has none.
pub const FALLBACK_BOOKMARK_TITLE: &str = "Закладка";

/// URL synthesized for a bookmark that lost its own.
pub const PLACEHOLDER_URL: &str = "about:blank";

/// Discriminant distinguishing the three node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Bookmark,
    Note,
}

/// A node in the bookmark tree, discriminated by the persisted `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(Folder),
    Bookmark(Bookmark),
    Note(Note),
}

/// A folder holding an ordered sequence of child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub title: String,
    pub children: Vec<Node>,
    /// Opaque reference into external icon blob storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A saved bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<i64>,
}

/// A rich-text note. `content` is an HTML fragment produced by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<i64>,
}

/// The distinguished top-level folder holding the entire tree.
///
/// Serializes to the same shape as a folder node (`"type": "folder"`), since
/// the persisted value is exactly one folder-shaped JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Folder(f) => &f.id,
            Node::Bookmark(b) => &b.id,
            Node::Note(n) => &n.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Node::Folder(f) => &f.title,
            Node::Bookmark(b) => &b.title,
            Node::Note(n) => &n.title,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Folder(_) => NodeKind::Folder,
            Node::Bookmark(_) => NodeKind::Bookmark,
            Node::Note(_) => NodeKind::Note,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Node::Folder(f) => Some(f),
            _ => None,
        }
    }

    /// Children of this node, if it is a folder.
    pub fn children(&self) -> Option<&[Node]> {
        self.as_folder().map(|f| f.children.as_slice())
    }
}
