//! Netscape bookmarks HTML import/export.
//!
//! Emits and parses the Netscape Bookmark File Format
//! (`<!DOCTYPE NETSCAPE-Bookmark-file-1>`): folders are `<DT><H3>` headings
//! followed by a nested `<DL>` list, bookmarks are `<DT><A HREF=...>`
//! anchors. One proprietary extension: rich-text notes travel as a
//! `<DT><NOTE TITLE="..." CONTENT="..." CREATED_AT="...">` element. This is
//! non-standard; parsers that do not know it will skip it.
//!
//! The parser is a tolerant hand-rolled scanner, not a full HTML parser — it
//! recognizes exactly the tags above, ASCII-case-insensitively, and skips
//! everything else. It depends on tree structure only, never on storage.

use crate::tree::id;
use crate::types::node::{
    Bookmark, Folder, Node, Note, Root, FALLBACK_BOOKMARK_TITLE, FALLBACK_FOLDER_TITLE,
    PLACEHOLDER_URL,
};

/// How imported nodes are combined with the existing tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Discard the current tree and use the imported nodes.
    Replace,
    /// Append the imported nodes after the existing top-level nodes.
    Merge,
}

/// Folders with these titles are legacy default browser-folder wrappers;
/// on import their children are spliced directly into the current level
/// instead of preserving a redundant wrapper folder.
const FLATTENED_FOLDER_TITLES: [&str; 2] = ["Панель закладок", "Другие закладки"];

// === Export ===

/// Serializes the tree to a Netscape bookmarks document.
pub fn to_html(root: &Root) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE NETSCAPE-Bookmark-file-1>\n");
    out.push_str("<!-- This is an automatically generated file. It will be read and overwritten. Do Not Edit! -->\n");
    out.push_str("<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n");
    out.push_str("<TITLE>Bookmarks</TITLE>\n");
    out.push_str("<H1>Bookmarks</H1>\n");
    out.push_str("<DL><p>\n");
    write_nodes(&mut out, &root.children, 1);
    out.push_str("</DL><p>\n");
    out
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    let pad = "    ".repeat(depth);
    for node in nodes {
        match node {
            Node::Folder(folder) => {
                out.push_str(&pad);
                out.push_str("<DT><H3>");
                out.push_str(&escape(&folder.title));
                out.push_str("</H3>\n");
                out.push_str(&pad);
                out.push_str("<DL><p>\n");
                write_nodes(out, &folder.children, depth + 1);
                out.push_str(&pad);
                out.push_str("</DL><p>\n");
            }
            Node::Bookmark(bookmark) => {
                out.push_str(&pad);
                out.push_str("<DT><A HREF=\"");
                out.push_str(&escape(&bookmark.url));
                out.push('"');
                if let Some(added_at) = bookmark.added_at {
                    out.push_str(&format!(" ADD_DATE=\"{}\"", added_at));
                }
                out.push('>');
                out.push_str(&escape(&bookmark.title));
                out.push_str("</A>\n");
            }
            Node::Note(note) => {
                out.push_str(&pad);
                out.push_str("<DT><NOTE TITLE=\"");
                out.push_str(&escape(&note.title));
                out.push_str("\" CONTENT=\"");
                out.push_str(&escape(&note.content));
                out.push('"');
                if let Some(created_at) = note.created_at {
                    out.push_str(&format!(" CREATED_AT=\"{}\"", created_at));
                }
                out.push_str("></NOTE>\n");
            }
        }
    }
}

// === Import ===

/// Parses a Netscape bookmarks document into an ordered sequence of nodes
/// (not yet wrapped as a root). Every parsed node gets a fresh id.
pub fn from_html(text: &str) -> Vec<Node> {
    let mut scanner = Scanner {
        input: text,
        pos: 0,
    };
    parse_level(&mut scanner)
}

enum Token {
    FolderHeading(String),
    ListOpen,
    ListClose,
    Anchor {
        url: String,
        title: String,
        add_date: Option<i64>,
    },
    NoteEntry {
        title: String,
        content: String,
        created_at: Option<i64>,
    },
}

/// Parses one nesting level, consuming up to (and including) the `</DL>`
/// that closes it.
fn parse_level(scanner: &mut Scanner) -> Vec<Node> {
    let mut nodes = Vec::new();
    // A folder heading waits here until its <DL> arrives.
    let mut pending_folder: Option<String> = None;

    loop {
        match scanner.next_token() {
            Some(Token::FolderHeading(title)) => {
                if let Some(prev) = pending_folder.take() {
                    // Heading without a list: an empty folder.
                    push_folder(&mut nodes, prev, Vec::new());
                }
                pending_folder = Some(title);
            }
            Some(Token::ListOpen) => {
                let children = parse_level(scanner);
                match pending_folder.take() {
                    Some(title) => push_folder(&mut nodes, title, children),
                    // An anonymous list — the document's outer <DL> —
                    // contributes its entries to the current level.
                    None => nodes.extend(children),
                }
            }
            Some(Token::ListClose) => break,
            Some(Token::Anchor {
                url,
                title,
                add_date,
            }) => {
                if let Some(prev) = pending_folder.take() {
                    push_folder(&mut nodes, prev, Vec::new());
                }
                nodes.push(Node::Bookmark(Bookmark {
                    id: id::generate(),
                    title: non_empty(title, FALLBACK_BOOKMARK_TITLE),
                    url: non_empty(url, PLACEHOLDER_URL),
                    favicon: None,
                    added_at: add_date,
                }));
            }
            Some(Token::NoteEntry {
                title,
                content,
                created_at,
            }) => {
                if let Some(prev) = pending_folder.take() {
                    push_folder(&mut nodes, prev, Vec::new());
                }
                nodes.push(Node::Note(Note {
                    id: id::generate(),
                    title: non_empty(title, FALLBACK_BOOKMARK_TITLE),
                    content,
                    created_at,
                    edited_at: None,
                }));
            }
            None => break,
        }
    }

    if let Some(prev) = pending_folder {
        push_folder(&mut nodes, prev, Vec::new());
    }
    nodes
}

fn push_folder(nodes: &mut Vec<Node>, title: String, children: Vec<Node>) {
    if FLATTENED_FOLDER_TITLES.contains(&title.as_str()) {
        nodes.extend(children);
        return;
    }
    nodes.push(Node::Folder(Folder {
        id: id::generate(),
        title: non_empty(title, FALLBACK_FOLDER_TITLE),
        children,
        icon: None,
    }));
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn next_token(&mut self) -> Option<Token> {
        while self.pos < self.input.len() {
            let lt = self.pos + self.input[self.pos..].find('<')?;
            let rest = &self.input[lt + 1..];
            if tag_matches(rest, "h3") {
                if let Some(token) = self.read_heading(lt) {
                    return Some(token);
                }
            } else if tag_matches(rest, "/dl") {
                self.pos = self.advance_past_gt(lt);
                return Some(Token::ListClose);
            } else if tag_matches(rest, "dl") {
                self.pos = self.advance_past_gt(lt);
                return Some(Token::ListOpen);
            } else if tag_matches(rest, "a") {
                if let Some(token) = self.read_anchor(lt) {
                    return Some(token);
                }
            } else if tag_matches(rest, "note") {
                if let Some(token) = self.read_note(lt) {
                    return Some(token);
                }
            }
            // Unknown or truncated tag: step past '<' and keep scanning.
            self.pos = lt + 1;
        }
        None
    }

    fn advance_past_gt(&self, lt: usize) -> usize {
        match self.input[lt..].find('>') {
            Some(gt) => lt + gt + 1,
            None => self.input.len(),
        }
    }

    fn read_heading(&mut self, lt: usize) -> Option<Token> {
        let gt = lt + self.input[lt..].find('>')?;
        let close = find_ci(self.input, gt + 1, "</h3>")?;
        let title = unescape(self.input[gt + 1..close].trim());
        self.pos = close + "</h3>".len();
        Some(Token::FolderHeading(title))
    }

    fn read_anchor(&mut self, lt: usize) -> Option<Token> {
        let gt = lt + self.input[lt..].find('>')?;
        let tag = &self.input[lt + 1..gt];
        let close = find_ci(self.input, gt + 1, "</a>")?;
        let title = unescape(self.input[gt + 1..close].trim());
        let url = get_attr(tag, "href").unwrap_or_default();
        let add_date = get_attr(tag, "add_date").and_then(|v| v.parse::<i64>().ok());
        self.pos = close + "</a>".len();
        Some(Token::Anchor {
            url,
            title,
            add_date,
        })
    }

    fn read_note(&mut self, lt: usize) -> Option<Token> {
        let gt = lt + self.input[lt..].find('>')?;
        let tag = &self.input[lt + 1..gt];
        let title = get_attr(tag, "title").unwrap_or_default();
        let content = get_attr(tag, "content").unwrap_or_default();
        let created_at = get_attr(tag, "created_at").and_then(|v| v.parse::<i64>().ok());
        self.pos = match find_ci(self.input, gt + 1, "</note>") {
            Some(close) => close + "</note>".len(),
            None => gt + 1,
        };
        Some(Token::NoteEntry {
            title,
            content,
            created_at,
        })
    }
}

/// Whether `rest` (the text right after a `<`) starts with the given tag
/// name, ASCII-case-insensitively, at a proper name boundary.
///
/// Compares raw bytes: `rest` may begin with a multibyte character (a
/// pseudo-tag like `<привет>`), where slicing at the name length would not
/// land on a char boundary.
fn tag_matches(rest: &str, name: &str) -> bool {
    let rest = rest.as_bytes();
    let name = name.as_bytes();
    if rest.len() < name.len() || !rest[..name.len()].eq_ignore_ascii_case(name) {
        return false;
    }
    match rest.get(name.len()) {
        None => true,
        Some(b'>') => true,
        Some(b) => b.is_ascii_whitespace(),
    }
}

/// ASCII-case-insensitive substring search. The needle must be ASCII, so the
/// returned index always lies on a char boundary.
fn find_ci(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let ned = needle.as_bytes();
    if from > hay.len() || ned.is_empty() || hay.len() - from < ned.len() {
        return None;
    }
    (from..=hay.len() - ned.len()).find(|&i| hay[i..i + ned.len()].eq_ignore_ascii_case(ned))
}

/// Extracts a `NAME="value"` attribute from a tag body, case-insensitively.
fn get_attr(tag: &str, name: &str) -> Option<String> {
    let pattern = format!("{}=\"", name);
    let mut from = 0;
    while let Some(i) = find_ci(tag, from, &pattern) {
        let at_boundary = i == 0 || tag.as_bytes()[i - 1].is_ascii_whitespace();
        if at_boundary {
            let start = i + pattern.len();
            let end = start + tag[start..].find('"')?;
            return Some(unescape(&tag[start..end]));
        }
        from = i + 1;
    }
    None
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
