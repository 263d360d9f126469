use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::search::results::QueryResults;

enum CacheStore {
    Unbounded(RwLock<HashMap<String, Arc<QueryResults>>>),
    Bounded(Mutex<LruCache<String, Arc<QueryResults>>>),
}

/// Query cache for avoiding recomputation, keyed by the raw query string.
///
/// Entries are only dropped by LRU eviction or by `clear` once a load completes.
/// Two threads missing on the same key both compute; the later `put` wins.
pub struct QueryCache {
    store: CacheStore,
    capacity: Option<usize>,
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
}

impl QueryCache {
    /// `None` or `Some(0)` keeps every entry.
    pub fn new(capacity: Option<usize>) -> Self {
        let capacity = capacity.and_then(NonZeroUsize::new);
        let store = match capacity {
            Some(cap) => CacheStore::Bounded(Mutex::new(LruCache::new(cap))),
            None => CacheStore::Unbounded(RwLock::new(HashMap::new())),
        };
        QueryCache {
            capacity: capacity.map(NonZeroUsize::get),
            store,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<QueryResults>> {
        let found = match &self.store {
            CacheStore::Unbounded(map) => map.read().get(key).cloned(),
            CacheStore::Bounded(lru) => lru.lock().get(key).cloned(),
        };
        let counter = if found.is_some() { &self.hit_count } else { &self.miss_count };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn put(&self, key: impl Into<String>, results: Arc<QueryResults>) {
        match &self.store {
            CacheStore::Unbounded(map) => {
                map.write().insert(key.into(), results);
            }
            CacheStore::Bounded(lru) => {
                lru.lock().put(key.into(), results);
            }
        }
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        match &self.store {
            CacheStore::Unbounded(map) => map.write().clear(),
            CacheStore::Bounded(lru) => lru.lock().clear(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.store {
            CacheStore::Unbounded(map) => map.read().len(),
            CacheStore::Bounded(lru) => lru.lock().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.len(),
            capacity: self.capacity,
        }
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("size", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: Option<usize>,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}
