//! The reference-counted style cache.
//!
//! Each [`StyleCache`] owns a key space. The first attach for a key allocates
//! a class name, renders the template with it and injects the resulting CSS
//! into the document. Later attaches for the same key only bump the count.
//! The release that brings the count back to zero removes the node and the
//! record in the same call.

use crate::config::StyleConfig;
use crate::error::StyleResult;
use crate::id::{self, ClassIdAllocator};
use crate::key::{StyleKey, StyleParams};
use csshook_core::alloc::HashMap;
use csshook_core::profiling::profile_function;
use csshook_core::{Document, StyleNodeId};
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

/// A boxed fallible style template: `(class_name, params) -> css`.
pub type TemplateFn<T> = dyn Fn(&str, &T) -> StyleResult<String> + Send + Sync;

/// Bookkeeping for one injected fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    key: StyleKey,
    class_name: String,
    node: StyleNodeId,
    ref_count: usize,
}

impl StyleRecord {
    pub fn key(&self) -> &StyleKey {
        &self.key
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The stylesheet node this record owns.
    pub fn node(&self) -> StyleNodeId {
        self.node
    }

    pub fn ref_count(&self) -> usize {
        self.ref_count
    }
}

/// Record table shared between a cache and its outstanding handles.
struct Records {
    document: Arc<dyn Document>,
    entries: Mutex<HashMap<StyleKey, StyleRecord>>,
    label: String,
}

impl Records {
    fn release(&self, key: &StyleKey) {
        profile_function!();
        let mut entries = self.entries.lock();

        let Some(record) = entries.get_mut(key) else {
            tracing::warn!("[{}] release for unknown key {:?} ignored", self.label, key.as_str());
            return;
        };

        record.ref_count = record.ref_count.saturating_sub(1);
        if record.ref_count > 0 {
            tracing::trace!(
                "[{}] {} released, {} consumers left",
                self.label,
                record.class_name,
                record.ref_count
            );
            return;
        }

        if let Some(record) = entries.remove(key) {
            if let Err(err) = self.document.remove_style_node(record.node) {
                tracing::warn!(
                    "[{}] failed to remove style node {} for {}: {}",
                    self.label,
                    record.node,
                    record.class_name,
                    err
                );
            }
            tracing::debug!("[{}] evicted {}", self.label, record.class_name);
        }
    }
}

/// A cache of injected style fragments for one template.
///
/// Mutation of the record table is serialized by a mutex, so attaches and
/// releases may come from any thread. The template runs while that lock is
/// held and must not call back into the same cache.
pub struct StyleCache<T> {
    records: Arc<Records>,
    template: Box<TemplateFn<T>>,
    ids: Arc<ClassIdAllocator>,
    config: StyleConfig,
}

impl<T: StyleParams> StyleCache<T> {
    pub fn new(
        document: Arc<dyn Document>,
        ids: Arc<ClassIdAllocator>,
        config: StyleConfig,
        template: Box<TemplateFn<T>>,
    ) -> Self {
        let records = Arc::new(Records {
            document,
            entries: Mutex::new(HashMap::new()),
            label: config.label().to_string(),
        });
        Self {
            records,
            template,
            ids,
            config,
        }
    }

    /// Derive the deduplication key for `params`.
    ///
    /// Empty params map to the empty key without evaluating the template.
    pub fn key_for(&self, params: &T) -> StyleResult<StyleKey> {
        if StyleParams::is_empty(params) {
            return Ok(StyleKey::empty());
        }
        (self.template)("", params).map(StyleKey::from)
    }

    /// Register a consumer of the fragment for `params`.
    ///
    /// The returned handle keeps the fragment injected until it is released
    /// or dropped.
    pub fn attach(&self, params: &T) -> StyleResult<StyleHandle> {
        let key = self.key_for(params)?;
        self.attach_keyed(key, params)
    }

    pub(crate) fn attach_keyed(&self, key: StyleKey, params: &T) -> StyleResult<StyleHandle> {
        profile_function!();
        let mut entries = self.records.entries.lock();

        let record = match entries.entry(key.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let (class_name, node) = self.inject(params)?;
                entry.insert(StyleRecord {
                    key: key.clone(),
                    class_name,
                    node,
                    ref_count: 0,
                })
            }
        };

        record.ref_count += 1;
        tracing::trace!(
            "[{}] {} attached, {} consumers",
            self.records.label,
            record.class_name,
            record.ref_count
        );

        Ok(StyleHandle {
            records: self.records.clone(),
            class_name: record.class_name.clone(),
            key,
            released: false,
        })
    }

    /// Render and inject a fragment under the next free class id.
    ///
    /// The id is claimed only once the node is in the document, so a failed
    /// attach leaves the allocator untouched. If another cache claimed the id
    /// in the meantime, the node is discarded and the fragment is rendered
    /// again under the next id.
    fn inject(&self, params: &T) -> StyleResult<(String, StyleNodeId)> {
        let document = &self.records.document;
        loop {
            let id = self.ids.peek();
            let class_name = id::class_name(&self.config.class_prefix, id);
            // Render before touching the document so a failing template
            // leaves nothing behind.
            let css = (self.template)(&class_name, params)?;
            let node = document.inject_style(&css)?;

            if self.ids.claim(id) {
                tracing::debug!(
                    "[{}] injected {} as {} ({} bytes)",
                    self.records.label,
                    class_name,
                    node,
                    css.len()
                );
                return Ok((class_name, node));
            }

            tracing::trace!("[{}] class id {} taken, retrying", self.records.label, id);
            if let Err(err) = document.remove_style_node(node) {
                tracing::warn!(
                    "[{}] failed to discard style node {}: {}",
                    self.records.label,
                    node,
                    err
                );
            }
        }
    }
}

impl<T> StyleCache<T> {
    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.entries.lock().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.entries.lock().contains_key(key)
    }

    /// Current consumer count for `key`, if a record is live.
    pub fn ref_count(&self, key: &str) -> Option<usize> {
        self.records.entries.lock().get(key).map(|r| r.ref_count)
    }

    /// Class name of the live record for `key`.
    pub fn class_name_of(&self, key: &str) -> Option<String> {
        self.records
            .entries
            .lock()
            .get(key)
            .map(|r| r.class_name.clone())
    }

    /// Keys of all live records, sorted.
    pub fn keys(&self) -> Vec<StyleKey> {
        let mut keys: Vec<_> = self.records.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Snapshot of all live records, sorted by key.
    pub fn records(&self) -> Vec<StyleRecord> {
        let mut records: Vec<_> = self.records.entries.lock().values().cloned().collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn allocator(&self) -> &Arc<ClassIdAllocator> {
        &self.ids
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.records.document
    }
}

impl<T> fmt::Debug for StyleCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleCache")
            .field("label", &self.records.label)
            .field("records", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

/// One consumer's claim on a style fragment.
///
/// Releasing (explicitly or by dropping) decrements the record's count and
/// evicts it when the count reaches zero. Each handle releases exactly once.
pub struct StyleHandle {
    records: Arc<Records>,
    key: StyleKey,
    class_name: String,
    released: bool,
}

impl StyleHandle {
    pub fn key(&self) -> &StyleKey {
        &self.key
    }

    /// Class name to apply to the consumer's element.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Release this claim now.
    pub fn release(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if !self.released {
            self.released = true;
            self.records.release(&self.key);
        }
    }
}

impl Drop for StyleHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for StyleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleHandle")
            .field("key", &self.key)
            .field("class_name", &self.class_name)
            .finish()
    }
}

static_assertions::assert_impl_all!(StyleHandle: Send, Sync);
static_assertions::assert_impl_all!(StyleCache<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryDocument;
    use crate::error::StyleError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache_with<T: StyleParams>(
        doc: &Arc<MemoryDocument>,
        template: impl Fn(&str, &T) -> StyleResult<String> + Send + Sync + 'static,
    ) -> StyleCache<T> {
        StyleCache::new(
            doc.clone(),
            Arc::new(ClassIdAllocator::new()),
            StyleConfig::default(),
            Box::new(template),
        )
    }

    #[test]
    fn test_first_attach_injects() {
        let doc = Arc::new(MemoryDocument::new());
        let cache = cache_with(&doc, |cls, _: &()| Ok(format!(".{cls}{{color:red}}")));

        let handle = cache.attach(&()).unwrap();
        assert_eq!(handle.class_name(), "_csshook-0");
        assert!(handle.key().is_empty());
        assert_eq!(doc.stylesheet(), "._csshook-0{color:red}");
        assert_eq!(cache.ref_count(""), Some(1));
    }

    #[test]
    fn test_reattach_reuses_record() {
        let doc = Arc::new(MemoryDocument::new());
        let renders = Arc::new(AtomicUsize::new(0));
        let counter = renders.clone();
        let cache = cache_with(&doc, move |cls, color: &String| {
            if !cls.is_empty() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            Ok(format!(".{cls}{{color:{color}}}"))
        });

        let red = String::from("red");
        let a = cache.attach(&red).unwrap();
        let b = cache.attach(&red).unwrap();
        assert_eq!(a.class_name(), b.class_name());
        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(doc.node_count(), 1);
        assert_eq!(cache.ref_count(".{color:red}"), Some(2));
    }

    #[test]
    fn test_last_release_evicts() {
        let doc = Arc::new(MemoryDocument::new());
        let cache = cache_with(&doc, |cls, _: &()| Ok(format!(".{cls}{{}}")));

        let a = cache.attach(&()).unwrap();
        let b = cache.attach(&()).unwrap();
        a.release();
        assert_eq!(doc.node_count(), 1);
        assert_eq!(cache.ref_count(""), Some(1));

        drop(b);
        assert_eq!(doc.node_count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_new_class_after_eviction() {
        let doc = Arc::new(MemoryDocument::new());
        let cache = cache_with(&doc, |cls, _: &()| Ok(format!(".{cls}{{}}")));

        let first = cache.attach(&()).unwrap();
        let first_class = first.class_name().to_string();
        first.release();

        let second = cache.attach(&()).unwrap();
        assert_ne!(second.class_name(), first_class);
    }

    #[test]
    fn test_template_error_leaves_no_record() {
        let doc = Arc::new(MemoryDocument::new());
        let cache = cache_with(&doc, |cls, n: &Option<u32>| {
            if cls.is_empty() {
                Ok(format!("{n:?}"))
            } else {
                Err(StyleError::template("boom"))
            }
        });

        let err = cache.attach(&Some(1)).unwrap_err();
        assert_eq!(err, StyleError::template("boom"));
        assert!(cache.is_empty());
        assert_eq!(doc.node_count(), 0);
    }

    #[test]
    fn test_failed_attach_keeps_class_id() {
        let doc = Arc::new(MemoryDocument::new());
        let cache = cache_with(&doc, |cls, n: &Option<u32>| match n {
            Some(0) if !cls.is_empty() => Err(StyleError::template("zero")),
            _ => Ok(format!(".{cls}{{order:{n:?}}}")),
        });

        assert!(cache.attach(&Some(0)).is_err());
        assert_eq!(cache.allocator().peek(), 0);

        let handle = cache.attach(&Some(1)).unwrap();
        assert_eq!(handle.class_name(), "_csshook-0");
        assert_eq!(cache.allocator().peek(), 1);
    }

    #[test]
    fn test_records_snapshot() {
        let doc = Arc::new(MemoryDocument::new());
        let cache = cache_with(&doc, |cls, color: &String| Ok(format!(".{cls}{{color:{color}}}")));

        let _blue = cache.attach(&"blue".to_string()).unwrap();
        let _red = cache.attach(&"red".to_string()).unwrap();

        let records = cache.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key().as_str(), ".{color:blue}");
        assert_eq!(records[0].class_name(), "_csshook-0");
        assert_eq!(records[1].class_name(), "_csshook-1");
        assert!(records.iter().all(|r| r.ref_count() == 1));
        assert!(records.iter().all(|r| doc.contains(r.node())));
        assert_eq!(cache.keys().len(), 2);
    }
}
