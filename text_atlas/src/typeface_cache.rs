// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded pool of loaded typefaces.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::Typeface;

/// Number of typefaces the cache aims to hold.
pub const TYPEFACE_CACHE_CAPACITY: usize = 1024;

static GLOBAL: LazyLock<TypefaceCache> = LazyLock::new(TypefaceCache::new);

/// Retains loaded typefaces so later lookups don't have to load them again.
///
/// The capacity is a soft limit. When it is reached, the oldest typefaces that nothing outside
/// the cache references are evicted, up to a quarter of the capacity at a time. Typefaces that
/// are still referenced elsewhere are never evicted, so the cache can grow past its capacity.
///
/// The cache is safe to share between threads. Each method takes the internal lock once and
/// releases it before returning; a sequence of calls is not atomic.
#[derive(Debug)]
pub struct TypefaceCache {
    typefaces: Mutex<Vec<Arc<dyn Typeface>>>,
    capacity: usize,
}

impl TypefaceCache {
    /// Creates an empty cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(TYPEFACE_CACHE_CAPACITY)
    }

    /// Creates an empty cache that starts evicting at `capacity` typefaces.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            typefaces: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// The capacity this cache starts evicting at.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Adds `typeface`, first evicting unreferenced typefaces if the cache is full.
    pub fn add(&self, typeface: Arc<dyn Typeface>) {
        let mut typefaces = self.lock();
        if typefaces.len() >= self.capacity {
            self.purge_locked(&mut typefaces);
        }
        typefaces.push(typeface);
    }

    /// Returns the oldest typeface matching `predicate`.
    ///
    /// The predicate runs on a snapshot of the cache after the lock is released, so it may call
    /// back into the cache.
    pub fn find_by_predicate(
        &self,
        mut predicate: impl FnMut(&dyn Typeface) -> bool,
    ) -> Option<Arc<dyn Typeface>> {
        let snapshot = self.lock().clone();
        snapshot.into_iter().find(|typeface| predicate(&**typeface))
    }

    /// Evicts up to a quarter of the capacity of the oldest typefaces that are only referenced
    /// by this cache.
    pub fn purge(&self) {
        let mut typefaces = self.lock();
        self.purge_locked(&mut typefaces);
    }

    /// Number of cached typefaces.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no typefaces.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn purge_locked(&self, typefaces: &mut Vec<Arc<dyn Typeface>>) {
        let mut remaining = self.capacity >> 2;
        let before = typefaces.len();
        typefaces.retain(|typeface| {
            if remaining == 0 || Arc::strong_count(typeface) > 1 {
                return true;
            }
            remaining -= 1;
            false
        });
        debug!("purged {} typefaces", before - typefaces.len());
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn Typeface>>> {
        // A panic while holding the lock can't leave the list inconsistent.
        self.typefaces.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TypefaceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::typeface;

    #[test]
    fn find_returns_oldest_match() {
        let cache = TypefaceCache::with_capacity(8);
        cache.add(typeface(1, false));
        cache.add(typeface(2, true));
        cache.add(typeface(3, true));
        let found = cache.find_by_predicate(|tf| tf.has_color()).unwrap();
        assert_eq!(found.unique_id(), 2);
        assert!(cache.find_by_predicate(|tf| tf.unique_id() == 9).is_none());
    }

    #[test]
    fn predicate_may_use_the_cache() {
        let cache = TypefaceCache::with_capacity(8);
        cache.add(typeface(1, false));
        cache.add(typeface(2, false));
        let found = cache
            .find_by_predicate(|tf| {
                cache.add(typeface(10 + tf.unique_id(), false));
                cache.len() == 4
            })
            .unwrap();
        assert_eq!(found.unique_id(), 2);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn adding_past_capacity_evicts_oldest_unreferenced() {
        let cache = TypefaceCache::with_capacity(8);
        for id in 0..8 {
            cache.add(typeface(id, false));
        }
        assert_eq!(cache.len(), 8);
        cache.add(typeface(8, false));
        // A quarter of the capacity is evicted before the new typeface is added.
        assert_eq!(cache.len(), 7);
        for id in 0..2 {
            assert!(cache.find_by_predicate(|tf| tf.unique_id() == id).is_none());
        }
        for id in 2..9 {
            assert!(cache.find_by_predicate(|tf| tf.unique_id() == id).is_some());
        }
    }

    #[test]
    fn referenced_typefaces_are_never_evicted() {
        let cache = TypefaceCache::with_capacity(4);
        let held: Vec<_> = (0..4).map(|id| typeface(id, false)).collect();
        for tf in &held {
            cache.add(tf.clone());
        }
        cache.add(typeface(4, false));
        cache.add(typeface(5, false));
        // Everything but the newest unreferenced typeface survives; the cache outgrows its
        // capacity.
        assert_eq!(cache.len(), 5);
        assert!(cache.find_by_predicate(|tf| tf.unique_id() == 4).is_none());
        for id in [0, 1, 2, 3, 5] {
            assert!(cache.find_by_predicate(|tf| tf.unique_id() == id).is_some());
        }
        drop(held);
        cache.purge();
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn purge_skips_referenced_entries() {
        let cache = TypefaceCache::with_capacity(8);
        let held = typeface(0, false);
        cache.add(held.clone());
        for id in 1..5 {
            cache.add(typeface(id, false));
        }
        cache.purge();
        assert_eq!(cache.len(), 3);
        assert!(cache.find_by_predicate(|tf| tf.unique_id() == 0).is_some());
        assert!(cache.find_by_predicate(|tf| tf.unique_id() == 3).is_some());
        assert_eq!(Arc::strong_count(&held), 2);
    }

    #[test]
    fn global_cache_is_shared() {
        assert!(core::ptr::eq(TypefaceCache::global(), TypefaceCache::global()));
        assert_eq!(TypefaceCache::global().capacity(), TYPEFACE_CACHE_CAPACITY);
    }
}
