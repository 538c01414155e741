//! Headless in-memory document.

use csshook_core::alloc::HashMap;
use csshook_core::{Document, DocumentError, DocumentResult, StyleNodeId};
use indexmap::IndexMap;
use parking_lot::Mutex;

#[derive(Default)]
struct MemoryHead {
    next_id: u64,
    /// Created but not yet appended.
    detached: HashMap<StyleNodeId, String>,
    /// Appended nodes in document order.
    head: IndexMap<StyleNodeId, String>,
}

/// A [`Document`] that keeps stylesheet nodes in memory.
///
/// Useful for hosts without a DOM (native renderers, tests) that still want
/// the cache's lifecycle and a single concatenated stylesheet.
///
/// # Example
///
/// ```rust
/// use csshook::MemoryDocument;
/// use csshook::Document;
///
/// let doc = MemoryDocument::new();
/// let node = doc.inject_style(".a{color:red}").unwrap();
/// assert_eq!(doc.stylesheet(), ".a{color:red}");
///
/// doc.remove_style_node(node).unwrap();
/// assert_eq!(doc.node_count(), 0);
/// ```
#[derive(Default)]
pub struct MemoryDocument {
    state: Mutex<MemoryHead>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes currently appended to the head.
    pub fn node_count(&self) -> usize {
        self.state.lock().head.len()
    }

    /// Text of an appended node.
    pub fn text_of(&self, node: StyleNodeId) -> Option<String> {
        self.state.lock().head.get(&node).cloned()
    }

    /// Whether the node is appended to the head.
    pub fn contains(&self, node: StyleNodeId) -> bool {
        self.state.lock().head.contains_key(&node)
    }

    /// Texts of all appended nodes in document order.
    pub fn texts(&self) -> Vec<String> {
        self.state.lock().head.values().cloned().collect()
    }

    /// All appended nodes joined by newlines, in document order.
    pub fn stylesheet(&self) -> String {
        self.texts().join("\n")
    }
}

impl Document for MemoryDocument {
    fn create_style_node(&self) -> DocumentResult<StyleNodeId> {
        let mut state = self.state.lock();
        let node = StyleNodeId::from_raw(state.next_id);
        state.next_id += 1;
        state.detached.insert(node, String::new());
        Ok(node)
    }

    fn set_text_content(&self, node: StyleNodeId, css: &str) -> DocumentResult<()> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let text = match state.head.get_mut(&node) {
            Some(text) => text,
            None => state
                .detached
                .get_mut(&node)
                .ok_or(DocumentError::UnknownNode(node))?,
        };
        text.clear();
        text.push_str(css);
        Ok(())
    }

    fn append_style_node(&self, node: StyleNodeId) -> DocumentResult<()> {
        let mut state = self.state.lock();
        // Re-appending moves the node to the end, as in a DOM.
        let text = match state.detached.remove(&node) {
            Some(text) => text,
            None => state
                .head
                .shift_remove(&node)
                .ok_or(DocumentError::UnknownNode(node))?,
        };
        state.head.insert(node, text);
        Ok(())
    }

    fn remove_style_node(&self, node: StyleNodeId) -> DocumentResult<()> {
        let mut state = self.state.lock();
        if state.head.shift_remove(&node).is_some() || state.detached.remove(&node).is_some() {
            Ok(())
        } else {
            Err(DocumentError::UnknownNode(node))
        }
    }
}
