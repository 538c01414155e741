//! Class id allocation.
//!
//! Ids are shared by every cache that uses the same allocator, so two live
//! records never share a class name unless the counter has wrapped all the
//! way around while the older record is still alive.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Largest integer exactly representable as an IEEE-754 double (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

static GLOBAL: OnceLock<Arc<ClassIdAllocator>> = OnceLock::new();

/// Monotonic id counter that wraps to 0 at `bound`.
#[derive(Debug)]
pub struct ClassIdAllocator {
    next: AtomicU64,
    bound: u64,
}

impl ClassIdAllocator {
    /// Allocator starting at 0 and wrapping at [`MAX_SAFE_INTEGER`].
    pub const fn new() -> Self {
        Self::with_start(0, MAX_SAFE_INTEGER)
    }

    /// Allocator with an explicit first id and wraparound bound.
    ///
    /// `bound` is clamped to at least 1 and `start` is reduced modulo it.
    pub const fn with_start(start: u64, bound: u64) -> Self {
        let bound = if bound == 0 { 1 } else { bound };
        Self {
            next: AtomicU64::new(start % bound),
            bound,
        }
    }

    /// The process-wide allocator.
    pub fn global() -> Arc<ClassIdAllocator> {
        GLOBAL
            .get_or_init(|| Arc::new(ClassIdAllocator::new()))
            .clone()
    }

    /// Take the current id and advance the counter.
    pub fn next_id(&self) -> u64 {
        let bound = self.bound;
        match self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |id| {
                Some((id + 1) % bound)
            }) {
            Ok(id) | Err(id) => id,
        }
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Acquire)
    }

    /// Advance past `id` if it is still the next id.
    ///
    /// Returns `false` when another caller took `id` first.
    pub fn claim(&self, id: u64) -> bool {
        self.next
            .compare_exchange(id, (id + 1) % self.bound, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }
}

impl Default for ClassIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a class name from a prefix and an allocated id.
pub fn class_name(prefix: &str, id: u64) -> String {
    format!("{}{}", prefix, id)
}

static_assertions::assert_impl_all!(ClassIdAllocator: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = ClassIdAllocator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn test_wraps_at_bound() {
        let ids = ClassIdAllocator::with_start(MAX_SAFE_INTEGER - 2, MAX_SAFE_INTEGER);
        assert_eq!(ids.next_id(), MAX_SAFE_INTEGER - 2);
        assert_eq!(ids.next_id(), MAX_SAFE_INTEGER - 1);
        // MAX_SAFE_INTEGER itself is never handed out.
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_claim_advances_once() {
        let ids = ClassIdAllocator::with_start(4, 5);
        let id = ids.peek();
        assert!(ids.claim(id));
        assert_eq!(ids.peek(), 0);
        // Already claimed.
        assert!(!ids.claim(id));
        assert_eq!(ids.peek(), 0);
    }

    #[test]
    fn test_start_reduced_modulo_bound() {
        let ids = ClassIdAllocator::with_start(12, 5);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.bound(), 5);
    }

    #[test]
    fn test_zero_bound_is_clamped() {
        let ids = ClassIdAllocator::with_start(7, 0);
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 0);
    }

    #[test]
    fn test_global_is_shared() {
        let a = ClassIdAllocator::global();
        let b = ClassIdAllocator::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_ids_unique() {
        let ids = Arc::new(ClassIdAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }

    #[test]
    fn test_class_name_format() {
        assert_eq!(class_name("_csshook-", 42), "_csshook-42");
        assert_eq!(class_name("", 0), "0");
    }
}
