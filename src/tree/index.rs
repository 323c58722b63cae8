//! Read-only lookup and traversal primitives over the bookmark tree.
//!
//! All searches are depth-first pre-order; when duplicate ids exist (tolerated
//! defensively, the invariant forbids them) the first match wins. Point
//! lookups are O(depth) on a well-balanced tree and O(n) worst case.

use crate::types::node::{Folder, Node, Root};

/// Finds a node by id anywhere in the tree.
pub fn find_by_id<'a>(root: &'a Root, id: &str) -> Option<&'a Node> {
    find_in(&root.children, id)
}

/// Finds a node by id within a forest of nodes.
pub fn find_in<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Node::Folder(folder) = node {
            if let Some(found) = find_in(&folder.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable variant of [`find_by_id`].
pub fn find_by_id_mut<'a>(root: &'a mut Root, id: &str) -> Option<&'a mut Node> {
    find_in_mut(&mut root.children, id)
}

fn find_in_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.id() == id {
            return Some(node);
        }
        if let Node::Folder(folder) = node {
            if let Some(found) = find_in_mut(&mut folder.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Finds a folder by id, for descending into its children mutably.
pub fn find_folder_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Folder> {
    for node in nodes.iter_mut() {
        if let Node::Folder(folder) = node {
            if folder.id == id {
                return Some(folder);
            }
            if let Some(found) = find_folder_mut(&mut folder.children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable children of the folder with the given id. The root's own id
/// resolves to the top-level children.
pub fn children_of_mut<'a>(root: &'a mut Root, folder_id: &str) -> Option<&'a mut Vec<Node>> {
    if folder_id == root.id {
        return Some(&mut root.children);
    }
    find_folder_mut(&mut root.children, folder_id).map(|folder| &mut folder.children)
}

/// Ordered children of the folder with the given id.
///
/// Returns an empty slice when the folder does not exist or the id names a
/// non-folder node; never fails.
pub fn list_children<'a>(root: &'a Root, folder_id: &str) -> &'a [Node] {
    if folder_id == root.id {
        return &root.children;
    }
    match find_by_id(root, folder_id) {
        Some(Node::Folder(folder)) => &folder.children,
        _ => &[],
    }
}

/// Folders-only skeleton of a forest, preserving hierarchy depth and order.
/// Used to populate folder pickers without exposing bookmarks or notes.
pub fn extract_folders(nodes: &[Node]) -> Vec<Node> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Folder(folder) => Some(Node::Folder(Folder {
                id: folder.id.clone(),
                title: folder.title.clone(),
                children: extract_folders(&folder.children),
                icon: folder.icon.clone(),
            })),
            _ => None,
        })
        .collect()
}

/// Titles along the path from the root to the immediate parent of `id`,
/// excluding the node itself. The first element is the root's own title.
/// `None` when the id is absent from the tree.
pub fn path_to(root: &Root, id: &str) -> Option<Vec<String>> {
    fn walk(nodes: &[Node], id: &str, path: &mut Vec<String>) -> bool {
        for node in nodes {
            if node.id() == id {
                return true;
            }
            if let Node::Folder(folder) = node {
                path.push(folder.title.clone());
                if walk(&folder.children, id, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    let mut path = vec![root.title.clone()];
    if walk(&root.children, id, &mut path) {
        Some(path)
    } else {
        None
    }
}

/// Locates the parent folder id and sibling index of a node, for splicing by
/// move/delete/reorder. The parent id is the root's own id for top-level nodes.
pub fn find_parent_and_index(root: &Root, id: &str) -> Option<(String, usize)> {
    fn walk(parent_id: &str, nodes: &[Node], id: &str) -> Option<(String, usize)> {
        for (index, node) in nodes.iter().enumerate() {
            if node.id() == id {
                return Some((parent_id.to_string(), index));
            }
            if let Node::Folder(folder) = node {
                if let Some(found) = walk(&folder.id, &folder.children, id) {
                    return Some(found);
                }
            }
        }
        None
    }

    walk(&root.id, &root.children, id)
}

/// Whether `id` lies inside the subtree rooted at `ancestor_id` (strictly —
/// a node is not its own descendant).
pub fn is_descendant(root: &Root, ancestor_id: &str, id: &str) -> bool {
    match find_by_id(root, ancestor_id) {
        Some(Node::Folder(folder)) => find_in(&folder.children, id).is_some(),
        _ => false,
    }
}

/// Case-insensitive substring search over titles, URLs and note content.
pub fn search(nodes: &[Node], query: &str) -> Vec<Node> {
    let needle = query.to_lowercase();
    let mut results = Vec::new();
    collect_matches(nodes, &needle, &mut results);
    results
}

fn collect_matches(nodes: &[Node], needle: &str, results: &mut Vec<Node>) {
    for node in nodes {
        let hit = match node {
            Node::Folder(folder) => folder.title.to_lowercase().contains(needle),
            Node::Bookmark(bookmark) => {
                bookmark.title.to_lowercase().contains(needle)
                    || bookmark.url.to_lowercase().contains(needle)
            }
            Node::Note(note) => {
                note.title.to_lowercase().contains(needle)
                    || note.content.to_lowercase().contains(needle)
            }
        };
        if hit {
            results.push(node.clone());
        }
        if let Node::Folder(folder) = node {
            collect_matches(&folder.children, needle, results);
        }
    }
}
