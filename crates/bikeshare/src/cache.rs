//! Process-wide memoization of expensive loads, keyed by source identity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::Result;

struct Entry<T> {
    fingerprint: String,
    value: Arc<T>,
}

/// Caches one immutable value per key, reloading when the key's
/// fingerprint changes.
///
/// Values are handed out as `Arc`s, so every reader shares the same snapshot
/// and nobody can mutate it. The lock is held across a load, which keeps
/// concurrent callers from loading the same source twice.
pub struct SourceCache<T> {
    entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T> Default for SourceCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> std::fmt::Debug for SourceCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl<T> SourceCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry<T>>> {
        // A panicking loader never inserts, so the map is consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached value for `key`, or run `loader` and cache its
    /// result when there is no entry or the fingerprint differs.
    ///
    /// A failed load leaves any previous entry in place and caches nothing.
    pub fn get_or_try_load<F>(&self, key: &str, fingerprint: &str, loader: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut entries = self.lock();
        if let Some(entry) = entries.get(key) {
            if entry.fingerprint == fingerprint {
                debug!(key, "Cache hit");
                return Ok(Arc::clone(&entry.value));
            }
            debug!(key, "Source changed, reloading");
        } else {
            debug!(key, "Cache miss");
        }

        let value = Arc::new(loader()?);
        entries.insert(
            key.to_string(),
            Entry {
                fingerprint: fingerprint.to_string(),
                value: Arc::clone(&value),
            },
        );
        Ok(value)
    }

    /// The cached value for `key`, whatever its fingerprint.
    pub fn peek(&self, key: &str) -> Option<Arc<T>> {
        self.lock().get(key).map(|entry| Arc::clone(&entry.value))
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BikeshareError;
    use std::cell::Cell;

    #[test]
    fn test_hit_returns_same_snapshot() {
        let cache = SourceCache::new();
        let loads = Cell::new(0);
        let load = || {
            loads.set(loads.get() + 1);
            Ok(vec![1, 2, 3])
        };

        let first = cache.get_or_try_load("data.csv", "10:1", load).unwrap();
        let second = cache.get_or_try_load("data.csv", "10:1", load).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_changed_fingerprint_reloads() {
        let cache = SourceCache::new();
        let first = cache.get_or_try_load("data.csv", "10:1", || Ok(1)).unwrap();
        let second = cache.get_or_try_load("data.csv", "12:2", || Ok(2)).unwrap();
        assert_eq!((*first, *second), (1, 2));
        assert_eq!(*cache.peek("data.csv").unwrap(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_caches_nothing() {
        let cache: SourceCache<u32> = SourceCache::new();
        let err = cache
            .get_or_try_load("data.csv", "1", || {
                Err(BikeshareError::EmptyData("no rows".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, BikeshareError::EmptyData(_)));
        assert!(cache.is_empty());

        assert_eq!(*cache.get_or_try_load("data.csv", "1", || Ok(5)).unwrap(), 5);
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = SourceCache::new();
        cache.get_or_try_load("a", "1", || Ok("a")).unwrap();
        cache.get_or_try_load("b", "1", || Ok("b")).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
