//! Cache keys and the parameter emptiness check.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// Deduplication key for a generated fragment.
///
/// The key is the template's output for an empty class name, or the empty
/// string when the parameters carry no fields at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleKey(String);

impl StyleKey {
    pub const fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StyleKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StyleKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::borrow::Borrow<str> for StyleKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Parameters accepted by a style template.
///
/// Parameters that report themselves empty share the empty key, and the
/// template is not evaluated to derive it. Structs with fields keep the
/// default and always derive their key from the template.
///
/// Fieldless types should override [`is_empty`](Self::is_empty) to return
/// `true`; with the default their key is still derived from the template.
///
/// ```rust
/// use csshook::StyleParams;
///
/// struct Plain;
///
/// impl StyleParams for Plain {
///     fn is_empty(&self) -> bool {
///         true
///     }
/// }
///
/// assert!(StyleParams::is_empty(&Plain));
/// ```
pub trait StyleParams {
    fn is_empty(&self) -> bool {
        false
    }
}

impl StyleParams for () {
    fn is_empty(&self) -> bool {
        true
    }
}

impl<T> StyleParams for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

impl<T> StyleParams for [T] {
    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }
}

impl<T> StyleParams for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V, S> StyleParams for HashMap<K, V, S> {
    fn is_empty(&self) -> bool {
        HashMap::is_empty(self)
    }
}

impl<K, V> StyleParams for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

impl<T, S> StyleParams for HashSet<T, S> {
    fn is_empty(&self) -> bool {
        HashSet::is_empty(self)
    }
}

impl<T> StyleParams for BTreeSet<T> {
    fn is_empty(&self) -> bool {
        BTreeSet::is_empty(self)
    }
}

impl<K, V, S> StyleParams for csshook_core::alloc::HashMap<K, V, S> {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<T, S> StyleParams for csshook_core::alloc::HashSet<T, S> {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<K, V, S> StyleParams for indexmap::IndexMap<K, V, S> {
    fn is_empty(&self) -> bool {
        indexmap::IndexMap::is_empty(self)
    }
}

impl<T: StyleParams + ?Sized> StyleParams for &T {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl StyleParams for String {}
impl StyleParams for str {}
