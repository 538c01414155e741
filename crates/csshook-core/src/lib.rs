//! csshook Core
//!
//! Shared collections, logging and profiling setup, and the [`Document`]
//! contract that style caches inject their stylesheet nodes through.

pub mod alloc;
pub mod document;
pub mod logging;
pub mod profiling;

pub use document::{Document, DocumentError, DocumentResult, StyleNodeId};
