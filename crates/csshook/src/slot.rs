//! Host lifecycle for a single consumer.
//!
//! A [`StyleSlot`] stands in for the framework pieces a component hook relies
//! on: a state cell holding the exposed class name, and a layout-phase effect
//! keyed on the style key. The host drives it in three steps:
//!
//! 1. [`render`](StyleSlot::render) during render, which returns the current
//!    state and stages a re-subscription when the key changed;
//! 2. [`commit`](StyleSlot::commit) in the layout phase, before paint, which
//!    releases the old key and then attaches the new one;
//! 3. [`unmount`](StyleSlot::unmount) (or drop) when the consumer goes away.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use csshook::{MemoryDocument, style};
//!
//! let doc = Arc::new(MemoryDocument::new());
//! let colored = style(doc.clone(), |cls, color: &String| format!(".{cls}{{color:{color}}}"));
//! let mut slot = colored.slot();
//!
//! // First render sees no class yet.
//! assert_eq!(slot.render(&"red".to_string()).unwrap(), "");
//! // The layout commit injects the style and asks for a re-render.
//! assert!(slot.commit().unwrap());
//! let class = slot.render(&"red".to_string()).unwrap().to_string();
//! assert!(class.starts_with("_csshook-"));
//!
//! slot.unmount();
//! assert_eq!(doc.node_count(), 0);
//! ```

use crate::cache::StyleHandle;
use crate::error::StyleResult;
use crate::generator::StyleGenerator;
use crate::key::{StyleKey, StyleParams};

struct PendingStyle<T> {
    key: StyleKey,
    params: T,
}

/// Per-consumer state cell and subscription.
pub struct StyleSlot<T: StyleParams + Clone> {
    generator: StyleGenerator<T>,
    class_name: String,
    pending: Option<PendingStyle<T>>,
    subscription: Option<StyleHandle>,
}

impl<T: StyleParams + Clone> StyleSlot<T> {
    pub fn new(generator: StyleGenerator<T>) -> Self {
        Self {
            generator,
            class_name: String::new(),
            pending: None,
            subscription: None,
        }
    }

    /// Render-phase call: derive the key and return the exposed class name.
    ///
    /// The class name is whatever the last commit exposed, so it is empty
    /// until the first commit.
    pub fn render(&mut self, params: &T) -> StyleResult<&str> {
        let key = self.generator.key_for(params)?;
        let subscribed = self.subscription.as_ref().map(StyleHandle::key);

        self.pending = if subscribed == Some(&key) {
            None
        } else {
            Some(PendingStyle {
                key,
                params: params.clone(),
            })
        };

        Ok(&self.class_name)
    }

    /// Layout-phase call: apply a staged re-subscription.
    ///
    /// The old key is released before the new one is attached. The class name
    /// is re-exposed on every attach; the return value is `true` when it
    /// differs from what the consumer last rendered with.
    ///
    /// If the attach fails the slot is left unsubscribed with an empty class
    /// name.
    pub fn commit(&mut self) -> StyleResult<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };

        if let Some(old) = self.subscription.take() {
            old.release();
        }

        match self.generator.cache().attach_keyed(pending.key, &pending.params) {
            Ok(handle) => {
                let changed = self.class_name != handle.class_name();
                self.class_name = handle.class_name().to_string();
                self.subscription = Some(handle);
                Ok(changed)
            }
            Err(err) => {
                self.class_name.clear();
                Err(err)
            }
        }
    }

    /// Render, commit and return the class name a re-render would see.
    pub fn sync(&mut self, params: &T) -> StyleResult<&str> {
        self.render(params)?;
        self.commit()?;
        Ok(&self.class_name)
    }

    /// Release the subscription and forget staged work.
    pub fn unmount(&mut self) {
        self.pending = None;
        if let Some(handle) = self.subscription.take() {
            handle.release();
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Key of the current subscription.
    pub fn subscribed_key(&self) -> Option<&StyleKey> {
        self.subscription.as_ref().map(StyleHandle::key)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Whether a render staged work for the next commit.
    pub fn has_pending_commit(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T: StyleParams + Clone> Drop for StyleSlot<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
