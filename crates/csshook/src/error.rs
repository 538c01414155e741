//! Error types for style generation.

use csshook_core::DocumentError;
use std::fmt;

/// Errors that abort an attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// The style template failed to produce CSS text.
    Template(String),

    /// The document failed to host the stylesheet node.
    Document(DocumentError),
}

impl StyleError {
    /// Convenience constructor for fallible templates.
    pub fn template(msg: impl Into<String>) -> Self {
        StyleError::Template(msg.into())
    }
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::Template(msg) => write!(f, "Style template failed: {}", msg),
            StyleError::Document(err) => write!(f, "Document error: {}", err),
        }
    }
}

impl std::error::Error for StyleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StyleError::Template(_) => None,
            StyleError::Document(err) => Some(err),
        }
    }
}

impl From<DocumentError> for StyleError {
    fn from(err: DocumentError) -> Self {
        StyleError::Document(err)
    }
}

/// Result type for style operations.
pub type StyleResult<T> = Result<T, StyleError>;
