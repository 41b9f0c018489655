//! Type-keyed cache implementation
//!
//! This module provides the `TypeCache` struct: a read-mostly map from
//! `TypeId` to shared, immutable entries.

use crate::stats::{CacheStats, Counters};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Read-mostly cache keyed by `TypeId`
///
/// Entries are computed outside the lock. When two threads race to fill the
/// same key, the first published entry wins and the later computation is
/// dropped, so every caller observes one shared `Arc` per key.
pub struct TypeCache<V: ?Sized> {
    entries: RwLock<HashMap<TypeId, Arc<V>>>,
    counters: Counters,
    label: &'static str,
}

impl<V: ?Sized> Debug for TypeCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCache")
            .field("label", &self.label)
            .field("stats", &self.stats())
            .finish()
    }
}

impl<V: ?Sized> Default for TypeCache<V> {
    fn default() -> Self {
        Self::new("type-cache")
    }
}

impl<V: ?Sized> TypeCache<V> {
    /// Create an empty cache; the label only shows up in traces and `Debug`
    pub fn new(label: &'static str) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            counters: Counters::default(),
            label,
        }
    }

    // Entries are immutable Arcs, a panic while holding the lock cannot leave
    // a half-written value behind.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Arc<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Arc<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up an entry without computing it
    pub fn get(&self, key: TypeId) -> Option<Arc<V>> {
        let found = self.read().get(&key).cloned();
        match found {
            Some(_) => self.counters.hit(),
            None => self.counters.miss(),
        }
        found
    }

    /// Return the cached entry, or compute and publish it
    pub fn get_or_insert_with<F>(&self, key: TypeId, compute: F) -> Arc<V>
    where
        F: FnOnce() -> Arc<V>,
    {
        if let Some(existing) = self.read().get(&key).cloned() {
            self.counters.hit();
            return existing;
        }

        self.counters.miss();
        tracing::trace!("[{}] computing entry for {:?}", self.label, key);
        let computed = compute();

        let mut entries = self.write();
        entries.entry(key).or_insert(computed).clone()
    }

    /// Insert an entry unless one is already present; returns the entry in the cache
    pub fn publish(&self, key: TypeId, value: Arc<V>) -> Arc<V> {
        self.write().entry(key).or_insert(value).clone()
    }

    pub fn contains(&self, key: TypeId) -> bool {
        self.read().contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.write().clear();
        self.counters.reset();
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len())
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct Alpha;
    struct Beta;

    #[test]
    fn test_compute_once_then_hit() {
        let cache: TypeCache<String> = TypeCache::new("names");
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_insert_with(TypeId::of::<Alpha>(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Arc::new("alpha".to_string())
        });
        let second = cache.get_or_insert_with(TypeId::of::<Alpha>(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Arc::new("other".to_string())
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, entries: 1 });
    }

    #[test]
    fn test_publish_keeps_first_entry() {
        let cache: TypeCache<u32> = TypeCache::default();
        let kept = cache.publish(TypeId::of::<Beta>(), Arc::new(1));
        let again = cache.publish(TypeId::of::<Beta>(), Arc::new(2));
        assert_eq!(*kept, 1);
        assert_eq!(*again, 1);
        assert_eq!(cache.get(TypeId::of::<Alpha>()), None);
    }

    #[test]
    fn test_unsized_values_and_clear() {
        let cache: TypeCache<dyn Fn() -> i32> = TypeCache::new("fns");
        let seven: Arc<dyn Fn() -> i32> = Arc::new(|| 7);
        let f = cache.get_or_insert_with(TypeId::of::<Alpha>(), move || seven);
        assert_eq!((*f)(), 7);
        assert!(cache.contains(TypeId::of::<Alpha>()));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().lookups(), 0);
    }

    #[test]
    fn test_concurrent_fill_shares_one_entry() {
        let cache: Arc<TypeCache<Vec<u8>>> = Arc::new(TypeCache::new("bytes"));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_insert_with(TypeId::of::<Alpha>(), || Arc::new(vec![i])))
            })
            .collect();

        let results: Vec<Arc<Vec<u8>>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results {
            assert!(Arc::ptr_eq(r, &results[0]));
        }
        assert_eq!(cache.len(), 1);
    }
}
