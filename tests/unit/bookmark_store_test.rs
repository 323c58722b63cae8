//! Unit tests for the BookmarkStore orchestrator.
//!
//! These tests exercise the collaborator-facing API through
//! `BookmarkStoreTrait`, using an in-memory key-value store. Every mutation
//! persists the whole root, so state must survive a brand-new store instance
//! over the same backing storage.

use treemark::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use treemark::services::import_export::ImportMode;
use treemark::storage::KvStore;
use treemark::types::errors::StoreError;
use treemark::types::node::{Node, NodeKind, Root, DEFAULT_FOLDER_TITLES, ROOT_ID, STORAGE_KEY};
use treemark::types::patch::NodePatch;

fn setup() -> KvStore {
    KvStore::open_in_memory().expect("Failed to open in-memory store")
}

/// First load over empty storage creates and persists the default tree.
#[test]
fn load_creates_and_persists_default_tree() {
    let kv = setup();
    let store = BookmarkStore::new(&kv);

    let root = store.load().unwrap();
    assert_eq!(root.id, ROOT_ID);
    let titles: Vec<&str> = root.children.iter().map(Node::title).collect();
    assert_eq!(titles, DEFAULT_FOLDER_TITLES);

    // The recreated tree was written back
    assert!(kv.get(STORAGE_KEY).unwrap().is_some());
}

/// Storage corruption never surfaces to the caller; load silently recovers.
#[test]
fn load_absorbs_unparseable_storage_text() {
    let kv = setup();
    kv.set(STORAGE_KEY, "{this is not json").unwrap();

    let store = BookmarkStore::new(&kv);
    let root = store.load().unwrap();
    assert_eq!(root.children.len(), 3);
}

/// A healed tree is persisted on load, so the second load finds it clean.
#[test]
fn load_persists_healed_tree() {
    let kv = setup();
    kv.set(
        STORAGE_KEY,
        r#"{"children":[{"title":"NoType","url":"http://x.com"}]}"#,
    )
    .unwrap();

    let store = BookmarkStore::new(&kv);
    let root = store.load().unwrap();
    assert_eq!(root.id, ROOT_ID);

    let stored = kv.get(STORAGE_KEY).unwrap().unwrap();
    let reloaded: Root = serde_json::from_str(&stored).unwrap();
    assert_eq!(reloaded, root);
}

#[test]
fn create_and_list_bookmarks_in_folder() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let folder = store.create_folder(ROOT_ID, "Чтение").unwrap();
    let bm = store
        .create_bookmark(folder.id(), "Example", "https://example.com")
        .unwrap();

    let children = store.get_bookmarks_in_folder(folder.id()).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id(), bm.id());

    match &children[0] {
        Node::Bookmark(b) => {
            assert_eq!(b.url, "https://example.com");
            assert!(b.added_at.is_some());
        }
        other => panic!("expected a bookmark, got {:?}", other),
    }
}

/// Mutations are durable: a fresh store over the same backing sees them.
#[test]
fn mutations_survive_a_new_store_instance() {
    let kv = setup();
    let folder_id = {
        let mut store = BookmarkStore::new(&kv);
        store.create_folder(ROOT_ID, "Durable").unwrap().id().to_string()
    };

    let store = BookmarkStore::new(&kv);
    let all = store.get_all_bookmarks().unwrap();
    assert!(all.iter().any(|n| n.id() == folder_id));
}

#[test]
fn create_note_and_update_it() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let note = store.create_note(ROOT_ID, "Memo", "<p>draft</p>").unwrap();
    let updated = store
        .update_note(note.id(), &NodePatch::new().content("<p>final</p>"))
        .unwrap();

    match updated {
        Node::Note(n) => {
            assert_eq!(n.content, "<p>final</p>");
            assert!(n.created_at.is_some());
            assert!(n.edited_at.is_some());
        }
        other => panic!("expected a note, got {:?}", other),
    }
}

#[test]
fn update_bookmark_patches_fields() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let bm = store
        .create_bookmark(ROOT_ID, "Old", "http://old.example")
        .unwrap();
    let updated = store
        .update_bookmark(bm.id(), &NodePatch::new().title("New").url("http://new.example"))
        .unwrap();
    assert_eq!(updated.title(), "New");

    let found = store.search_bookmarks("new.example").unwrap();
    assert_eq!(found.len(), 1);
}

/// delete returns the removed subtree so the caller can archive it to trash.
#[test]
fn delete_returns_removed_subtree_and_persists() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let folder = store.create_folder(ROOT_ID, "Doomed").unwrap();
    store
        .create_bookmark(folder.id(), "Inside", "http://in.example")
        .unwrap();

    let removed = store.delete_bookmark(folder.id()).unwrap();
    assert_eq!(removed.title(), "Doomed");
    assert_eq!(removed.children().unwrap().len(), 1);

    let all = store.get_all_bookmarks().unwrap();
    assert!(!all.iter().any(|n| n.id() == folder.id()));
}

#[test]
fn delete_missing_node_is_a_tree_error() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);
    store.load().unwrap();

    let err = store.delete_bookmark("missing").unwrap_err();
    assert!(matches!(err, StoreError::Tree(_)));
}

#[test]
fn move_bookmark_between_folders() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let a = store.create_folder(ROOT_ID, "A").unwrap();
    let b = store.create_folder(ROOT_ID, "B").unwrap();
    let bm = store
        .create_bookmark(a.id(), "Example", "https://example.com")
        .unwrap();

    store.move_bookmark(bm.id(), b.id()).unwrap();

    assert!(store.get_bookmarks_in_folder(a.id()).unwrap().is_empty());
    let in_b = store.get_bookmarks_in_folder(b.id()).unwrap();
    assert_eq!(in_b.len(), 1);
    assert_eq!(in_b[0].id(), bm.id());
}

/// A failed move leaves the persisted tree untouched; callers refresh from
/// persisted truth.
#[test]
fn failed_move_does_not_change_persisted_state() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let a = store.create_folder(ROOT_ID, "A").unwrap();
    let before = store.load().unwrap();

    assert!(store.move_bookmark(a.id(), a.id()).is_err());
    assert_eq!(store.load().unwrap(), before);
}

#[test]
fn reorder_with_none_target_moves_to_end() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let a = store.create_folder(ROOT_ID, "A").unwrap();
    let _b = store.create_folder(ROOT_ID, "B").unwrap();

    // [defaults.., A, B] -> A to the very end
    store.reorder_bookmarks(a.id(), None, ROOT_ID).unwrap();
    let all = store.get_all_bookmarks().unwrap();
    assert_eq!(all.last().unwrap().id(), a.id());
}

#[test]
fn reorder_before_named_target() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let a = store.create_folder(ROOT_ID, "A").unwrap();
    let b = store.create_folder(ROOT_ID, "B").unwrap();

    store.reorder_bookmarks(b.id(), Some(a.id()), ROOT_ID).unwrap();

    let all = store.get_all_bookmarks().unwrap();
    let pos_a = all.iter().position(|n| n.id() == a.id()).unwrap();
    let pos_b = all.iter().position(|n| n.id() == b.id()).unwrap();
    assert_eq!(pos_b + 1, pos_a);
}

#[test]
fn get_folder_tree_excludes_bookmarks_and_notes() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let folder = store.create_folder(ROOT_ID, "Only").unwrap();
    store
        .create_bookmark(ROOT_ID, "Loose", "http://x.example")
        .unwrap();
    store.create_note(folder.id(), "Memo", "").unwrap();

    let tree = store.get_folder_tree().unwrap();
    assert!(tree.iter().all(Node::is_folder));
    let only = tree.iter().find(|n| n.id() == folder.id()).unwrap();
    assert!(only.children().unwrap().is_empty());
}

#[test]
fn path_to_exposes_breadcrumbs() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let outer = store.create_folder(ROOT_ID, "Outer").unwrap();
    let inner = store.create_folder(outer.id(), "Inner").unwrap();
    let bm = store
        .create_bookmark(inner.id(), "Deep", "http://deep.example")
        .unwrap();

    let path = store.path_to(bm.id()).unwrap().unwrap();
    assert_eq!(path, vec!["root", "Outer", "Inner"]);
}

#[test]
fn copy_bookmark_duplicates_with_new_identity() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let bm = store
        .create_bookmark(ROOT_ID, "Original", "http://orig.example")
        .unwrap();
    let copy = store.copy_bookmark(bm.id(), ROOT_ID).unwrap();

    assert_ne!(copy.id(), bm.id());
    assert_eq!(copy.title(), "Original");

    let matches = store.search_bookmarks("orig.example").unwrap();
    assert_eq!(matches.len(), 2);
}

/// The post-repair verification on a crafted pathological root.
#[test]
fn requires_full_reset_checks() {
    let good = treemark::tree::repair::default_root();
    assert!(!BookmarkStore::requires_full_reset(&good));

    let mut no_folders = good.clone();
    no_folders.children = vec![Node::Bookmark(treemark::types::node::Bookmark {
        id: "b".to_string(),
        title: "B".to_string(),
        url: "http://x.example".to_string(),
        favicon: None,
        added_at: None,
    })];
    assert!(BookmarkStore::requires_full_reset(&no_folders));

    let mut empty = good.clone();
    empty.children.clear();
    assert!(BookmarkStore::requires_full_reset(&empty));

    let mut untitled_child = good.clone();
    if let Some(f) = untitled_child.children[0].as_folder_mut() {
        f.title.clear();
    }
    assert!(BookmarkStore::requires_full_reset(&untitled_child));

    let mut bad_root = good;
    bad_root.id.clear();
    assert!(BookmarkStore::requires_full_reset(&bad_root));
}

// === import / export ===

#[test]
fn export_contains_netscape_doctype_and_nodes() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);

    let folder = store.create_folder(ROOT_ID, "Work").unwrap();
    store
        .create_bookmark(folder.id(), "Site", "http://example.com")
        .unwrap();

    let html = store.export_to_html().unwrap();
    assert!(html.starts_with("<!DOCTYPE NETSCAPE-Bookmark-file-1>"));
    assert!(html.contains("<DT><H3>Work</H3>"));
    assert!(html.contains("HREF=\"http://example.com\""));
}

#[test]
fn import_replace_swaps_the_tree() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);
    store.create_folder(ROOT_ID, "Doomed").unwrap();

    let html = r#"
<!DOCTYPE NETSCAPE-Bookmark-file-1>
<DL><p>
    <DT><H3>Imported</H3>
    <DL><p>
        <DT><A HREF="http://a.example">A</A>
    </DL><p>
</DL><p>
"#;
    let imported = store.import_from_html(html, ImportMode::Replace).unwrap();
    assert_eq!(imported, 1);

    let all = store.get_all_bookmarks().unwrap();
    assert!(!all.iter().any(|n| n.title() == "Doomed"));
    assert!(all.iter().any(|n| n.title() == "Imported"));
}

#[test]
fn import_merge_appends_after_existing() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);
    let kept = store.create_folder(ROOT_ID, "Kept").unwrap();

    let html = "<DL><p><DT><H3>Merged</H3><DL><p></DL><p></DL><p>";
    store.import_from_html(html, ImportMode::Merge).unwrap();

    let all = store.get_all_bookmarks().unwrap();
    let pos_kept = all.iter().position(|n| n.id() == kept.id()).unwrap();
    let pos_merged = all.iter().position(|n| n.title() == "Merged").unwrap();
    assert!(pos_kept < pos_merged);
}

/// Replacing with a bookmarks-only document must not strand the tree in a
/// state the next load would wipe: a folder child is guaranteed.
#[test]
fn import_replace_of_flat_bookmarks_keeps_a_folder() {
    let kv = setup();
    let mut store = BookmarkStore::new(&kv);
    store.load().unwrap();

    let html = "<DL><p><DT><A HREF=\"http://solo.example\">Solo</A></DL><p>";
    store.import_from_html(html, ImportMode::Replace).unwrap();

    let root = store.load().unwrap();
    assert!(root.children.iter().any(|n| n.title() == "Solo"));
    assert!(root.children.iter().any(Node::is_folder));
    assert_eq!(root.kind, NodeKind::Folder);
}
