//! Mock implementation of [`Document`] for testing.
//!
//! Records operations instead of touching a real DOM.

use csshook_core::{Document, DocumentError, DocumentResult, StyleNodeId};
use parking_lot::Mutex;

/// Records a document operation for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCall {
    CreateStyleNode { node: StyleNodeId },
    SetTextContent { node: StyleNodeId, css: String },
    AppendStyleNode { node: StyleNodeId },
    RemoveStyleNode { node: StyleNodeId },
}

impl DocumentCall {
    pub fn node(&self) -> StyleNodeId {
        match self {
            DocumentCall::CreateStyleNode { node }
            | DocumentCall::SetTextContent { node, .. }
            | DocumentCall::AppendStyleNode { node }
            | DocumentCall::RemoveStyleNode { node } => *node,
        }
    }
}

/// Operation that can be made to fail once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Create,
    SetText,
    Append,
    Remove,
}

#[derive(Debug, Clone)]
struct MockNode {
    id: StyleNodeId,
    text: String,
    appended: bool,
}

/// Mock [`Document`] for testing.
///
/// Uses `parking_lot::Mutex` for interior mutability so `&self` methods can
/// record calls while staying `Send + Sync`.
pub struct MockDocument {
    /// Recorded calls for verification
    calls: Mutex<Vec<DocumentCall>>,

    /// Nodes created and not yet removed, in creation order
    nodes: Mutex<Vec<MockNode>>,

    /// Counter for generating node ids
    next_node_id: Mutex<u64>,

    /// Pending one-shot failures
    failures: Mutex<Vec<FailOn>>,
}

impl MockDocument {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            nodes: Mutex::new(Vec::new()),
            next_node_id: Mutex::new(0),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Make the next `op` call fail with [`DocumentError::Rejected`].
    pub fn fail_next(&self, op: FailOn) {
        self.failures.lock().push(op);
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<DocumentCall> {
        self.calls.lock().clone()
    }

    pub fn count_creates(&self) -> usize {
        self.count(|call| matches!(call, DocumentCall::CreateStyleNode { .. }))
    }

    pub fn count_appends(&self) -> usize {
        self.count(|call| matches!(call, DocumentCall::AppendStyleNode { .. }))
    }

    pub fn count_removes(&self) -> usize {
        self.count(|call| matches!(call, DocumentCall::RemoveStyleNode { .. }))
    }

    /// Whether `node` exists and is appended.
    pub fn is_live(&self, node: StyleNodeId) -> bool {
        self.nodes
            .lock()
            .iter()
            .any(|n| n.id == node && n.appended)
    }

    /// Number of appended nodes.
    pub fn live_count(&self) -> usize {
        self.nodes.lock().iter().filter(|n| n.appended).count()
    }

    /// Texts of appended nodes in creation order.
    pub fn live_texts(&self) -> Vec<String> {
        self.nodes
            .lock()
            .iter()
            .filter(|n| n.appended)
            .map(|n| n.text.clone())
            .collect()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn count(&self, pred: impl Fn(&DocumentCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    fn take_failure(&self, op: FailOn) -> DocumentResult<()> {
        let mut failures = self.failures.lock();
        match failures.iter().position(|f| *f == op) {
            Some(idx) => {
                failures.remove(idx);
                Err(DocumentError::Rejected(format!("injected {:?} failure", op)))
            }
            None => Ok(()),
        }
    }

    fn with_node<R>(
        &self,
        node: StyleNodeId,
        f: impl FnOnce(&mut MockNode) -> R,
    ) -> DocumentResult<R> {
        let mut nodes = self.nodes.lock();
        nodes
            .iter_mut()
            .find(|n| n.id == node)
            .map(f)
            .ok_or(DocumentError::UnknownNode(node))
    }
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MockDocument {
    fn create_style_node(&self) -> DocumentResult<StyleNodeId> {
        self.take_failure(FailOn::Create)?;

        let mut id = self.next_node_id.lock();
        let node = StyleNodeId::from_raw(*id);
        *id += 1;

        self.nodes.lock().push(MockNode {
            id: node,
            text: String::new(),
            appended: false,
        });
        self.calls.lock().push(DocumentCall::CreateStyleNode { node });

        Ok(node)
    }

    fn set_text_content(&self, node: StyleNodeId, css: &str) -> DocumentResult<()> {
        self.take_failure(FailOn::SetText)?;
        self.with_node(node, |n| n.text = css.to_string())?;
        self.calls.lock().push(DocumentCall::SetTextContent {
            node,
            css: css.to_string(),
        });
        Ok(())
    }

    fn append_style_node(&self, node: StyleNodeId) -> DocumentResult<()> {
        self.take_failure(FailOn::Append)?;
        self.with_node(node, |n| n.appended = true)?;
        self.calls.lock().push(DocumentCall::AppendStyleNode { node });
        Ok(())
    }

    fn remove_style_node(&self, node: StyleNodeId) -> DocumentResult<()> {
        self.take_failure(FailOn::Remove)?;
        {
            let mut nodes = self.nodes.lock();
            let idx = nodes
                .iter()
                .position(|n| n.id == node)
                .ok_or(DocumentError::UnknownNode(node))?;
            nodes.remove(idx);
        }
        self.calls.lock().push(DocumentCall::RemoveStyleNode { node });
        Ok(())
    }
}
