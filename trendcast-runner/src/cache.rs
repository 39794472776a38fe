//! Bounded in-memory cache of fetched series.
//!
//! Keys are normalized symbols. The least recently used entry is evicted
//! once the cache is full. Failed fetches are never stored. The lock is not
//! held while a source is being queried, so two threads missing on the same
//! symbol may both fetch; the later insert wins.

use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::source::{normalize_symbol, Fetched, PriceSource, SourceError};
use trendcast_core::domain::Symbol;

pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<Symbol, Fetched>,
    /// Front is least recently used.
    recency: VecDeque<Symbol>,
    hits: u64,
    misses: u64,
}

impl CacheInner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }

    fn get(&mut self, key: &str) -> Option<Fetched> {
        let hit = self.map.get(key).cloned();
        if hit.is_some() {
            self.touch(key);
        }
        hit
    }

    fn put(&mut self, key: Symbol, value: Fetched, capacity: usize) {
        if self.map.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.recency.push_back(key);
        while self.map.len() > capacity {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.map.remove(&oldest);
            tracing::debug!(symbol = %oldest, "evicted cached series");
        }
    }
}

/// Thread-safe LRU cache keyed by normalized symbol.
#[derive(Debug)]
pub struct SourceCache {
    inner: Mutex<CacheInner>,
    capacity: NonZeroUsize,
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl SourceCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached series for `symbol`, fetching it from `source` on a
    /// miss.
    pub fn get_or_fetch(
        &self,
        symbol: &str,
        source: &dyn PriceSource,
    ) -> Result<Fetched, SourceError> {
        let key = normalize_symbol(symbol);

        {
            let mut inner = self.lock();
            if let Some(hit) = inner.get(&key) {
                inner.hits += 1;
                tracing::debug!(symbol = %key, "cache hit");
                return Ok(hit);
            }
            inner.misses += 1;
        }

        let fetched = source.fetch_tagged(&key)?;
        self.lock().put(key, fetched.clone(), self.capacity.get());
        Ok(fetched)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.lock().map.contains_key(&normalize_symbol(symbol))
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
        inner.recency.clear();
    }

    pub fn hits(&self) -> u64 {
        self.lock().hits
    }

    pub fn misses(&self) -> u64 {
        self.lock().misses
    }
}
