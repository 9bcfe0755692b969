//! Synthetic document tree — the assistant's view of the page.
//!
//! Arena-backed: nodes are slots in a `Vec`, addressed by [`NodeId`], so
//! ids stay valid after a subtree is detached and late writers can check
//! [`Document::is_attached`] before touching a node. Every mutation bumps
//! a revision counter published on a watch channel; the observer re-runs
//! its attachment sweep per revision, the way a page mutation observer
//! re-fires on subtree changes.
//!
//! Shared as [`SharedDocument`] between the observer task, click handlers,
//! and timer tasks. Locks are held only across synchronous sections, never
//! across an await.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

/// Handle to one node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    width: u32,
    height: u32,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: String::new(),
            width: 0,
            height: 0,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// A document tree plus its mutation-revision channel.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    revision: u64,
    revision_tx: watch::Sender<u64>,
}

/// How the document is shared between the observer, click handlers, and
/// timer tasks.
pub type SharedDocument = Arc<Mutex<Document>>;

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            nodes: vec![Node::new("html")],
            root: NodeId(0),
            revision: 0,
            revision_tx,
        }
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Subscribe to mutation revisions. The receiver sees every bump made
    /// after this call.
    pub fn watch_revisions(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    fn bump(&mut self) {
        self.revision += 1;
        let _ = self.revision_tx.send(self.revision);
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Create a detached element. It joins the tree via [`append_child`]
    /// or [`insert_after`].
    ///
    /// [`append_child`]: Document::append_child
    /// [`insert_after`]: Document::insert_after
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.bump();
    }

    /// Insert `node` as the next sibling of `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        let Some(parent) = self.nodes[sibling.0].parent else {
            return;
        };
        let at = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == sibling)
            .map(|i| i + 1)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(at, node);
        self.bump();
    }

    /// Detach the subtree rooted at `node`. The node keeps its id but is
    /// no longer reachable from the root.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
        self.bump();
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// True while the node is reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current == self.root
    }

    // ── Attributes, text, layout ─────────────────────────────────────

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
        self.bump();
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attrs.remove(name);
        self.bump();
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.nodes[node.0].attrs.contains_key(name)
    }

    /// Replace the node's own text.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
        self.bump();
    }

    /// The node's own text plus all descendant text, document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.nodes[node.0].text.clone();
        for child in self.descendants(node) {
            out.push_str(&self.nodes[child.0].text);
        }
        out
    }

    /// Rendered size; nodes start at 0x0 (not visible).
    pub fn set_layout(&mut self, node: NodeId, width: u32, height: u32) {
        let n = &mut self.nodes[node.0];
        n.width = width;
        n.height = height;
        self.bump();
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        let n = &self.nodes[node.0];
        n.width > 0 && n.height > 0
    }

    /// Mark the node as the focus target.
    pub fn focus(&mut self, node: NodeId) {
        for id in 0..self.nodes.len() {
            self.nodes[id].attrs.remove("data-focused");
        }
        self.nodes[node.0]
            .attrs
            .insert("data-focused".to_string(), "1".to_string());
        self.bump();
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Subtree of `node` in document (pre-)order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    /// First descendant of `from` matching the predicate, document order.
    pub fn find_where<F>(&self, from: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.descendants(from).into_iter().find(|&n| pred(self, n))
    }

    /// All descendants of `from` matching the predicate, document order.
    pub fn find_all_where<F>(&self, from: NodeId, pred: F) -> Vec<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.descendants(from)
            .into_iter()
            .filter(|&n| pred(self, n))
            .collect()
    }

    /// True if any ancestor of `node` matches the predicate.
    pub fn has_ancestor<F>(&self, node: NodeId, pred: F) -> bool
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        let mut current = self.nodes[node.0].parent;
        while let Some(ancestor) = current {
            if pred(self, ancestor) {
                return true;
            }
            current = self.nodes[ancestor.0].parent;
        }
        false
    }

    /// First descendant carrying `id="..."`.
    pub fn find_by_id(&self, from: NodeId, id: &str) -> Option<NodeId> {
        self.find_where(from, |d, n| d.attr(n, "id") == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_query_in_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(a, inner);
        doc.set_attr(inner, "role", "note");
        doc.set_attr(b, "role", "note");

        let found = doc.find_all_where(root, |d, n| d.attr(n, "role") == Some("note"));
        assert_eq!(found, vec![inner, b]);
    }

    #[test]
    fn removed_subtree_is_detached_but_ids_stay_valid() {
        let mut doc = Document::new();
        let root = doc.root();
        let dialog = doc.create_element("div");
        let textbox = doc.create_element("div");
        doc.append_child(root, dialog);
        doc.append_child(dialog, textbox);
        assert!(doc.is_attached(textbox));

        doc.remove(dialog);
        assert!(!doc.is_attached(dialog));
        assert!(!doc.is_attached(textbox));
        // the slot still answers queries
        assert_eq!(doc.tag(textbox), "div");
    }

    #[test]
    fn insert_after_lands_between_siblings() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.create_element("div");
        let last = doc.create_element("div");
        doc.append_child(root, first);
        doc.append_child(root, last);

        let middle = doc.create_element("div");
        doc.insert_after(first, middle);
        assert_eq!(doc.children(root), &[first, middle, last]);
        assert_eq!(doc.parent(middle), Some(root));
    }

    #[test]
    fn text_content_includes_descendants() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(root, outer);
        doc.append_child(outer, inner);
        doc.set_text(outer, "hello ");
        doc.set_text(inner, "world");
        assert_eq!(doc.text_content(outer), "hello world");
    }

    #[test]
    fn visibility_needs_nonzero_area() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        assert!(!doc.is_visible(node));
        doc.set_layout(node, 600, 0);
        assert!(!doc.is_visible(node));
        doc.set_layout(node, 600, 40);
        assert!(doc.is_visible(node));
    }

    #[test]
    fn mutations_bump_the_published_revision() {
        let mut doc = Document::new();
        let rx = doc.watch_revisions();
        let start = *rx.borrow();

        let node = doc.create_element("div");
        let root = doc.root();
        doc.append_child(root, node);
        doc.set_attr(node, "role", "dialog");
        doc.set_text(node, "x");
        doc.remove(node);

        assert!(*rx.borrow() >= start + 4);
    }

    #[test]
    fn has_ancestor_walks_to_the_root() {
        let mut doc = Document::new();
        let root = doc.root();
        let article = doc.create_element("article");
        let div = doc.create_element("div");
        doc.append_child(root, article);
        doc.append_child(article, div);
        doc.set_attr(article, "role", "article");

        assert!(doc.has_ancestor(div, |d, n| d.attr(n, "role") == Some("article")));
        assert!(!doc.has_ancestor(article, |d, n| d.attr(n, "role") == Some("article")));
    }
}
