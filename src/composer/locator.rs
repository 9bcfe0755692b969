//! Element discovery strategies.
//!
//! The structural markers of the reply composer are isolated behind
//! [`ComposerLocator`] so the attachment controller never hard-codes page
//! structure. Fixtures (or a future page layout) swap strategies without
//! touching the controller.

use super::dom::{Document, NodeId};

/// Cap on the surrounding-thread context fed into the prompt.
pub const CONTEXT_MAX_CHARS: usize = 240;

/// Tweet text plus optional surrounding context pulled from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadText {
    pub tweet: String,
    pub context: String,
}

/// What the attachment controller needs to find on the page.
pub trait ComposerLocator: Send + Sync {
    /// The open reply dialog, if any.
    fn find_dialog(&self, doc: &Document) -> Option<NodeId>;

    /// The action toolbar inside a composer root that is eligible for
    /// control injection.
    fn find_toolbar(&self, doc: &Document, root: NodeId) -> Option<NodeId>;

    /// The editable reply textbox inside a composer root.
    fn find_textbox(&self, doc: &Document, root: NodeId) -> Option<NodeId>;

    /// The tweet being replied to, and one piece of thread context.
    fn extract_thread(&self, doc: &Document) -> ThreadText;
}

/// Default strategy, keyed to the composer's stable structural markers.
pub struct StructuralLocator;

impl ComposerLocator for StructuralLocator {
    fn find_dialog(&self, doc: &Document) -> Option<NodeId> {
        doc.find_where(doc.root(), |d, n| d.attr(n, "role") == Some("dialog"))
    }

    fn find_toolbar(&self, doc: &Document, root: NodeId) -> Option<NodeId> {
        // Only the scroll-snap tablist qualifies. Falling back to other
        // containers injects duplicates, so a miss is a miss.
        doc.find_where(root, |d, n| {
            d.attr(n, "data-testid") == Some("ScrollSnap-List")
                && d.attr(n, "role") == Some("tablist")
        })
    }

    fn find_textbox(&self, doc: &Document, root: NodeId) -> Option<NodeId> {
        let candidates = doc.find_all_where(root, |d, n| {
            d.attr(n, "role") == Some("textbox")
                && d.attr(n, "contenteditable") == Some("true")
        });
        candidates
            .iter()
            .copied()
            .find(|&n| doc.is_visible(n))
            .or_else(|| candidates.first().copied())
    }

    fn extract_thread(&self, doc: &Document) -> ThreadText {
        let nodes = doc.find_all_where(doc.root(), |d, n| {
            d.tag(n) == "div"
                && d.has_attr(n, "lang")
                && d.has_ancestor(n, |d2, a| {
                    d2.tag(a) == "article" && d2.attr(a, "role") == Some("article")
                })
        });

        let mut thread = ThreadText::default();
        if let Some(&first) = nodes.first() {
            thread.tweet = doc.text_content(first).trim().to_string();
        }
        if let Some(&second) = nodes.get(1) {
            thread.context = doc
                .text_content(second)
                .trim()
                .chars()
                .take(CONTEXT_MAX_CHARS)
                .collect();
        }
        thread
    }
}
