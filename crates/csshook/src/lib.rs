//! csshook
//!
//! Reference-counted style injection for UI components.
//!
//! A [`StyleGenerator`] wraps a template `(class_name, params) -> css`. Each
//! distinct set of parameters gets one generated class name and one stylesheet
//! node in the [`Document`](csshook_core::Document); the node stays injected
//! while at least one consumer holds it and is removed the moment the last one
//! lets go.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use csshook::{MemoryDocument, style};
//!
//! let doc = Arc::new(MemoryDocument::new());
//! let colored = style(doc.clone(), |cls, color: &String| format!(".{cls}{{color:{color}}}"));
//!
//! let a = colored.attach(&"red".to_string()).unwrap();
//! let b = colored.attach(&"red".to_string()).unwrap();
//! assert_eq!(a.class_name(), b.class_name());
//! assert_eq!(doc.node_count(), 1);
//!
//! drop(a);
//! drop(b);
//! assert_eq!(doc.node_count(), 0);
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod id;
pub mod key;
pub mod slot;

pub use cache::{StyleCache, StyleHandle, StyleRecord, TemplateFn};
pub use config::{DEFAULT_CLASS_PREFIX, StyleConfig};
pub use document::MemoryDocument;
pub use error::{StyleError, StyleResult};
pub use generator::{StyleGenerator, StyleGeneratorBuilder, style, try_style};
pub use id::{ClassIdAllocator, MAX_SAFE_INTEGER};
pub use key::{StyleKey, StyleParams};
pub use slot::StyleSlot;

pub use csshook_core::{Document, DocumentError, DocumentResult, StyleNodeId};
