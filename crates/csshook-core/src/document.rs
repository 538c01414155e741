//! The document collaborator contract.
//!
//! A style cache never touches a real DOM. It talks to a [`Document`], which
//! owns the style-bearing container (the `<head>` in a browser) and hands out
//! opaque [`StyleNodeId`] handles for the nodes it creates.

use std::fmt;

/// Opaque handle to a stylesheet node owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleNodeId(u64);

impl StyleNodeId {
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StyleNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StyleNodeId({})", self.0)
    }
}

static_assertions::assert_eq_size!(StyleNodeId, u64);

/// Errors reported by a [`Document`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The node is not known to this document (never created, or removed).
    UnknownNode(StyleNodeId),

    /// The document refused the operation.
    Rejected(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::UnknownNode(node) => write!(f, "Unknown style node: {}", node),
            DocumentError::Rejected(msg) => write!(f, "Document rejected operation: {}", msg),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// A document that can host stylesheet nodes.
///
/// Methods take `&self`; implementations use interior mutability so a single
/// document can be shared by any number of caches.
pub trait Document: Send + Sync {
    /// Create a detached, empty stylesheet node.
    fn create_style_node(&self) -> DocumentResult<StyleNodeId>;

    /// Replace the text content of a node.
    fn set_text_content(&self, node: StyleNodeId, css: &str) -> DocumentResult<()>;

    /// Append a node to the style-bearing container.
    fn append_style_node(&self, node: StyleNodeId) -> DocumentResult<()>;

    /// Remove a node from the document, whether or not it was appended.
    fn remove_style_node(&self, node: StyleNodeId) -> DocumentResult<()>;

    /// Create a node holding `css` and append it.
    ///
    /// The text is set before the node is appended. If setting the text or
    /// appending fails, the node is removed again before the error is
    /// returned.
    fn inject_style(&self, css: &str) -> DocumentResult<StyleNodeId> {
        let node = self.create_style_node()?;
        let populated = self
            .set_text_content(node, css)
            .and_then(|()| self.append_style_node(node));

        if let Err(err) = populated {
            if let Err(cleanup) = self.remove_style_node(node) {
                tracing::warn!("Failed to discard style node {}: {}", node, cleanup);
            }
            return Err(err);
        }

        Ok(node)
    }
}
