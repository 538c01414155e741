//! Test utilities for csshook.
//!
//! - `MockDocument` - a [`Document`](csshook_core::Document) that records every
//!   call and can be told to fail (requires the `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use csshook_core::Document;
//! use csshook_test_utils::MockDocument;
//!
//! let doc = MockDocument::new();
//! let node = doc.inject_style(".a{color:red}").unwrap();
//!
//! assert_eq!(doc.count_appends(), 1);
//! assert_eq!(doc.live_texts(), vec![".a{color:red}".to_string()]);
//! assert!(doc.is_live(node));
//! # }
//! ```

#[cfg(feature = "mock")]
pub mod mock_document;

#[cfg(feature = "mock")]
pub use mock_document::*;
