//! Structural edit operations over the bookmark tree.
//!
//! Every operation mutates the tree in place and is atomic from the caller's
//! perspective: it either completes fully or fails with a [`TreeError`] and
//! leaves the tree untouched. The caller owns persistence.

use crate::tree::{id, index};
use crate::types::errors::TreeError;
use crate::types::node::{Folder, Node, Root};
use crate::types::patch::NodePatch;

/// Appends `node` to the children of the folder `parent_id`. The root's own
/// id is always a valid parent.
pub fn insert(root: &mut Root, parent_id: &str, node: Node) -> Result<Node, TreeError> {
    ensure_folder(root, parent_id)?;
    let children = index::children_of_mut(root, parent_id)
        .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
    children.push(node.clone());
    Ok(node)
}

/// Shallow-merges `patch` into the node with the given id.
///
/// Only fields applicable to the node's variant are written; `id` and `type`
/// are never touched. Patching a note's title or content refreshes its
/// `edited_at` timestamp.
pub fn update(root: &mut Root, node_id: &str, patch: &NodePatch) -> Result<Node, TreeError> {
    let node = index::find_by_id_mut(root, node_id)
        .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?;
    match node {
        Node::Folder(folder) => {
            if let Some(title) = &patch.title {
                folder.title = title.clone();
            }
        }
        Node::Bookmark(bookmark) => {
            if let Some(title) = &patch.title {
                bookmark.title = title.clone();
            }
            if let Some(url) = &patch.url {
                bookmark.url = url.clone();
            }
            if let Some(favicon) = &patch.favicon {
                bookmark.favicon = Some(favicon.clone());
            }
        }
        Node::Note(note) => {
            let edited = patch.title.is_some() || patch.content.is_some();
            if let Some(title) = &patch.title {
                note.title = title.clone();
            }
            if let Some(content) = &patch.content {
                note.content = content.clone();
            }
            if edited {
                note.edited_at = Some(id::now_millis());
            }
        }
    }
    Ok(node.clone())
}

/// Splices the node out of its parent's children and returns the removed
/// subtree, so the caller can archive it before it is gone. Deletion is
/// irreversible within the tree.
pub fn delete(root: &mut Root, node_id: &str) -> Result<Node, TreeError> {
    let (parent_id, index_in_parent) = index::find_parent_and_index(root, node_id)
        .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?;
    let children = index::children_of_mut(root, &parent_id)
        .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?;
    Ok(children.remove(index_in_parent))
}

/// Relocates a node to the end of `new_parent_id`'s children.
///
/// Rejected with [`TreeError::SelfMove`] when the destination is the node
/// itself or one of its descendants — that is the only thing standing between
/// this tree and a cycle, so it is checked before anything is spliced.
pub fn move_node(root: &mut Root, node_id: &str, new_parent_id: &str) -> Result<(), TreeError> {
    if new_parent_id == node_id {
        return Err(TreeError::SelfMove(node_id.to_string()));
    }
    if index::find_parent_and_index(root, node_id).is_none() {
        return Err(TreeError::NodeNotFound(node_id.to_string()));
    }
    ensure_folder(root, new_parent_id)?;
    if index::is_descendant(root, node_id, new_parent_id) {
        return Err(TreeError::SelfMove(node_id.to_string()));
    }

    let removed = delete(root, node_id)?;
    // The destination was verified above and cannot sit inside the removed
    // subtree, so it is still reachable here.
    let children = index::children_of_mut(root, new_parent_id)
        .ok_or_else(|| TreeError::ParentNotFound(new_parent_id.to_string()))?;
    children.push(removed);
    Ok(())
}

/// Re-inserts the node immediately before the sibling `target_id` within
/// `parent_id`'s children.
///
/// Fails with [`TreeError::TargetNotFound`] when the target is not currently
/// among those children (stale UI state); the tree is left untouched rather
/// than guessing a position.
pub fn reorder_before(
    root: &mut Root,
    node_id: &str,
    target_id: &str,
    parent_id: &str,
) -> Result<(), TreeError> {
    if node_id == target_id {
        return Ok(());
    }
    let children = index::children_of_mut(root, parent_id)
        .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
    let from = children
        .iter()
        .position(|n| n.id() == node_id)
        .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?;
    if !children.iter().any(|n| n.id() == target_id) {
        return Err(TreeError::TargetNotFound(target_id.to_string()));
    }

    let node = children.remove(from);
    let to = children
        .iter()
        .position(|n| n.id() == target_id)
        .ok_or_else(|| TreeError::TargetNotFound(target_id.to_string()))?;
    children.insert(to, node);
    Ok(())
}

/// Removes the node from `parent_id`'s children and appends it at the end.
/// Equivalent to a reorder whose target is "after the last sibling".
pub fn move_to_end(root: &mut Root, node_id: &str, parent_id: &str) -> Result<(), TreeError> {
    let children = index::children_of_mut(root, parent_id)
        .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
    let from = children
        .iter()
        .position(|n| n.id() == node_id)
        .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?;
    let node = children.remove(from);
    children.push(node);
    Ok(())
}

/// Deep-clones the subtree rooted at `node_id` and inserts the clone under
/// `dest_parent_id`. Every cloned node gets a fresh id.
pub fn copy(root: &mut Root, node_id: &str, dest_parent_id: &str) -> Result<Node, TreeError> {
    let source = index::find_by_id(root, node_id)
        .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?
        .clone();
    let clone = clone_with_fresh_ids(&source);
    insert(root, dest_parent_id, clone)
}

fn clone_with_fresh_ids(node: &Node) -> Node {
    match node {
        Node::Folder(folder) => Node::Folder(Folder {
            id: id::generate(),
            title: folder.title.clone(),
            children: folder.children.iter().map(clone_with_fresh_ids).collect(),
            icon: folder.icon.clone(),
        }),
        Node::Bookmark(bookmark) => {
            let mut clone = bookmark.clone();
            clone.id = id::generate();
            Node::Bookmark(clone)
        }
        Node::Note(note) => {
            let mut clone = note.clone();
            clone.id = id::generate();
            Node::Note(clone)
        }
    }
}

/// Verifies that `folder_id` resolves to a folder (or is the root itself).
fn ensure_folder(root: &Root, folder_id: &str) -> Result<(), TreeError> {
    if folder_id == root.id {
        return Ok(());
    }
    match index::find_by_id(root, folder_id) {
        None => Err(TreeError::ParentNotFound(folder_id.to_string())),
        Some(Node::Folder(_)) => Ok(()),
        Some(_) => Err(TreeError::NotAFolder(folder_id.to_string())),
    }
}
