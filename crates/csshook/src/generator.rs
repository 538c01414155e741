//! Style generator factory.

use crate::cache::{StyleCache, StyleHandle};
use crate::config::StyleConfig;
use crate::error::StyleResult;
use crate::id::ClassIdAllocator;
use crate::key::{StyleKey, StyleParams};
use crate::slot::StyleSlot;
use csshook_core::Document;
use std::fmt;
use std::sync::Arc;

/// Create a generator for an infallible template.
///
/// The generator gets its own empty cache and draws class ids from
/// [`ClassIdAllocator::global`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use csshook::{MemoryDocument, style};
///
/// let doc = Arc::new(MemoryDocument::new());
/// let red = style(doc.clone(), |cls, _: &()| format!(".{cls}{{color:red}}"));
///
/// let handle = red.attach(&()).unwrap();
/// assert!(handle.class_name().starts_with("_csshook-"));
/// assert_eq!(doc.node_count(), 1);
///
/// drop(handle);
/// assert_eq!(doc.node_count(), 0);
/// ```
pub fn style<T, F>(document: Arc<dyn Document>, template: F) -> StyleGenerator<T>
where
    T: StyleParams,
    F: Fn(&str, &T) -> String + Send + Sync + 'static,
{
    StyleGenerator::builder(document).build(template)
}

/// Create a generator for a template that can fail.
pub fn try_style<T, F>(document: Arc<dyn Document>, template: F) -> StyleGenerator<T>
where
    T: StyleParams,
    F: Fn(&str, &T) -> StyleResult<String> + Send + Sync + 'static,
{
    StyleGenerator::builder(document).try_build(template)
}

/// Turns parameters into a class name backed by an injected stylesheet.
///
/// Cloning is cheap and clones share the same cache.
pub struct StyleGenerator<T> {
    cache: Arc<StyleCache<T>>,
}

impl<T> Clone for StyleGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<T> fmt::Debug for StyleGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StyleGenerator").field(&self.cache).finish()
    }
}

impl StyleGenerator<()> {
    pub fn builder(document: Arc<dyn Document>) -> StyleGeneratorBuilder {
        StyleGeneratorBuilder::new(document)
    }
}

impl<T: StyleParams> StyleGenerator<T> {
    /// Attach a consumer directly, bypassing the host lifecycle.
    pub fn attach(&self, params: &T) -> StyleResult<StyleHandle> {
        self.cache.attach(params)
    }

    pub fn key_for(&self, params: &T) -> StyleResult<StyleKey> {
        self.cache.key_for(params)
    }

    /// A fresh consumer slot bound to this generator.
    pub fn slot(&self) -> StyleSlot<T>
    where
        T: Clone,
    {
        StyleSlot::new(self.clone())
    }
}

impl<T> StyleGenerator<T> {
    pub fn cache(&self) -> &StyleCache<T> {
        &self.cache
    }

    /// Whether both generators share one cache.
    pub fn same_cache(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cache, &other.cache)
    }
}

/// Builder for [`StyleGenerator`].
pub struct StyleGeneratorBuilder {
    document: Arc<dyn Document>,
    ids: Option<Arc<ClassIdAllocator>>,
    config: StyleConfig,
}

impl StyleGeneratorBuilder {
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            ids: None,
            config: StyleConfig::default(),
        }
    }

    /// Draw class ids from `ids` instead of the global allocator.
    pub fn allocator(mut self, ids: Arc<ClassIdAllocator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn config(mut self, config: StyleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config = self.config.with_class_prefix(prefix);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config = self.config.with_label(label);
        self
    }

    pub fn build<T, F>(self, template: F) -> StyleGenerator<T>
    where
        T: StyleParams,
        F: Fn(&str, &T) -> String + Send + Sync + 'static,
    {
        self.try_build(move |class_name: &str, params: &T| Ok(template(class_name, params)))
    }

    pub fn try_build<T, F>(self, template: F) -> StyleGenerator<T>
    where
        T: StyleParams,
        F: Fn(&str, &T) -> StyleResult<String> + Send + Sync + 'static,
    {
        let ids = self.ids.unwrap_or_else(ClassIdAllocator::global);
        tracing::debug!(
            "created style generator '{}' (prefix {:?})",
            self.config.label(),
            self.config.class_prefix
        );
        StyleGenerator {
            cache: Arc::new(StyleCache::new(
                self.document,
                ids,
                self.config,
                Box::new(template),
            )),
        }
    }
}

static_assertions::assert_impl_all!(StyleGenerator<()>: Send, Sync, Clone);
