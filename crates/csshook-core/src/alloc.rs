//! Hash collections used across csshook.
//!
//! Re-exports AHash-backed maps and sets so every crate in the workspace
//! hashes cache keys the same way.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
