//! LUT cache with LRU eviction.
//!
//! Keeps parsed [`LutModel`]s keyed by source id so repeated loads of the
//! same file skip decoding. Bounded by both a byte budget and an entry
//! count; whichever is hit first triggers eviction of the least recently
//! used entry.
//!
//! All operations go through one mutex, so a `put` checks, evicts and
//! inserts atomically with respect to other callers.
//!
//! # Example
//!
//! ```rust
//! use lutkit_io::cache::{CacheConfig, LutCache};
//! use lutkit_lut::{ColorSpaceTag, LutModel};
//!
//! let cache = LutCache::new(CacheConfig::default().with_max_count(8)).unwrap();
//! let lut = LutModel::identity("identity", 17, ColorSpaceTag::Srgb).unwrap();
//! cache.put("identity", lut).unwrap();
//! assert!(cache.get("identity").is_some());
//! ```

use std::collections::HashMap;
use std::mem::size_of;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lutkit_lut::{ColorSpaceTag, LutModel};
use tracing::{debug, trace};

use crate::{IoError, IoResult};

/// Default byte budget (50MB).
pub const DEFAULT_MAX_SIZE: usize = 50 * 1024 * 1024;

/// Default entry budget.
pub const DEFAULT_MAX_COUNT: usize = 100;

/// Fixed per-entry bookkeeping added to every footprint.
pub const ENTRY_OVERHEAD: usize =
    size_of::<String>() + 2 * size_of::<f32>() + size_of::<ColorSpaceTag>();

/// Bytes charged against the budget for one model.
///
/// Same value on insert and on removal, so `total_size` never drifts.
pub fn footprint(lut: &LutModel) -> usize {
    lut.cube_bytes().len() + ENTRY_OVERHEAD + lut.title().len() + lut.description().len()
}

/// Cache limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Byte budget across all entries.
    pub max_size: usize,
    /// Maximum number of entries.
    pub max_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl CacheConfig {
    /// Creates a config with explicit limits.
    pub fn new(max_size: usize, max_count: usize) -> Self {
        Self { max_size, max_count }
    }

    /// Sets the byte budget.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets the entry budget.
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    /// Rejects zero limits.
    pub fn validate(&self) -> IoResult<()> {
        if self.max_size == 0 {
            return Err(IoError::InvalidConfig("max_size must be greater than zero".into()));
        }
        if self.max_count == 0 {
            return Err(IoError::InvalidConfig("max_count must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries evicted to make room.
    pub evictions: u64,
    /// Entries currently cached.
    pub entry_count: usize,
    /// Peak memory usage in bytes.
    pub peak_size: usize,
}

impl CacheStats {
    /// Hit rate as percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Cached model plus its place in the LRU list.
#[derive(Debug)]
struct CacheEntry {
    lut: Arc<LutModel>,
    footprint: usize,
    /// Neighbour towards the most recent end.
    prev: Option<String>,
    /// Neighbour towards the least recent end.
    next: Option<String>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Most recently used.
    lru_head: Option<String>,
    /// Least recently used.
    lru_tail: Option<String>,
    total_size: usize,
    stats: CacheStats,
}

impl CacheState {
    /// Links an existing entry at the front of the LRU list.
    fn add_to_lru(&mut self, key: &str) {
        let old_head = self.lru_head.replace(key.to_string());
        match &old_head {
            Some(old) => {
                if let Some(node) = self.entries.get_mut(old) {
                    node.prev = Some(key.to_string());
                }
            }
            None => self.lru_tail = Some(key.to_string()),
        }
        if let Some(node) = self.entries.get_mut(key) {
            node.prev = None;
            node.next = old_head;
        }
    }

    /// Unlinks an entry from the LRU list, leaving it in the map.
    fn remove_from_lru(&mut self, key: &str) {
        let (prev, next) = match self.entries.get_mut(key) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match &prev {
            Some(prev_key) => {
                if let Some(prev_node) = self.entries.get_mut(prev_key) {
                    prev_node.next = next.clone();
                }
            }
            None => self.lru_head = next.clone(),
        }

        match &next {
            Some(next_key) => {
                if let Some(next_node) = self.entries.get_mut(next_key) {
                    next_node.prev = prev;
                }
            }
            None => self.lru_tail = prev,
        }
    }

    fn update_lru(&mut self, key: &str) {
        self.remove_from_lru(key);
        self.add_to_lru(key);
    }

    fn insert(&mut self, key: String, lut: Arc<LutModel>, footprint: usize) {
        self.entries.insert(
            key.clone(),
            CacheEntry {
                lut,
                footprint,
                prev: None,
                next: None,
            },
        );
        self.add_to_lru(&key);
        self.total_size += footprint;
        self.stats.peak_size = self.stats.peak_size.max(self.total_size);
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.remove_from_lru(key);
        let entry = self.entries.remove(key)?;
        self.total_size = self.total_size.saturating_sub(entry.footprint);
        Some(entry)
    }

    /// Evicts the least recently used entry. Returns false when empty.
    fn evict(&mut self) -> bool {
        let Some(key) = self.lru_tail.clone() else {
            return false;
        };
        if let Some(entry) = self.remove(&key) {
            self.stats.evictions += 1;
            debug!(id = %key, footprint = entry.footprint, "evicted LUT from cache");
        }
        true
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.lru_head = None;
        self.lru_tail = None;
        self.total_size = 0;
    }
}

/// Thread-safe LUT cache with LRU eviction.
///
/// Each instance is independent; share it by reference or `Arc`.
#[derive(Debug)]
pub struct LutCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl LutCache {
    /// Creates an empty cache. Fails with [`IoError::InvalidConfig`] on zero
    /// limits.
    pub fn new(config: CacheConfig) -> IoResult<Self> {
        config.validate()?;
        debug!(max_size = config.max_size, max_count = config.max_count, "LutCache::new");
        Ok(Self {
            config,
            state: Mutex::new(CacheState::default()),
        })
    }

    /// Locks the state, recovering from a poisoned lock.
    ///
    /// Every mutation leaves the state consistent before the next statement
    /// can panic, so the data behind a poisoned lock is still valid.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the configured limits.
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Looks up a model, marking it most recently used on a hit.
    pub fn get(&self, id: &str) -> Option<Arc<LutModel>> {
        let mut state = self.lock();
        let lut = state.entries.get(id).map(|e| Arc::clone(&e.lut));
        match lut {
            Some(lut) => {
                state.update_lru(id);
                state.stats.hits += 1;
                trace!(id, "cache hit");
                Some(lut)
            }
            None => {
                state.stats.misses += 1;
                trace!(id, "cache miss");
                None
            }
        }
    }

    /// Inserts a model, replacing any entry under the same id.
    ///
    /// Evicts least recently used entries until the new one fits both
    /// budgets. An entry larger than the whole byte budget is rejected with
    /// [`IoError::EntryTooLarge`] and the cache is left untouched.
    pub fn put(&self, id: impl Into<String>, lut: impl Into<Arc<LutModel>>) -> IoResult<()> {
        let id = id.into();
        let lut = lut.into();
        let footprint = footprint(&lut);
        if footprint > self.config.max_size {
            return Err(IoError::EntryTooLarge {
                max_size: self.config.max_size,
                footprint,
            });
        }

        let mut state = self.lock();
        state.remove(&id);
        while !state.entries.is_empty()
            && (state.total_size + footprint > self.config.max_size
                || state.entries.len() >= self.config.max_count)
        {
            if !state.evict() {
                break;
            }
        }
        trace!(id = %id, footprint, "cache put");
        state.insert(id, lut, footprint);
        Ok(())
    }

    /// Returns the cached model or builds, caches and returns a new one.
    ///
    /// `build` runs without the lock held. A model too large to cache is
    /// still returned, just not stored.
    pub fn get_or_try_insert_with<F>(&self, id: &str, build: F) -> IoResult<Arc<LutModel>>
    where
        F: FnOnce() -> IoResult<LutModel>,
    {
        if let Some(lut) = self.get(id) {
            return Ok(lut);
        }
        let lut = Arc::new(build()?);
        match self.put(id, Arc::clone(&lut)) {
            Ok(()) => {}
            Err(IoError::EntryTooLarge { max_size, footprint }) => {
                debug!(id, max_size, footprint, "LUT too large to cache");
            }
            Err(e) => return Err(e),
        }
        Ok(lut)
    }

    /// Removes an entry, returning its model.
    pub fn remove(&self, id: &str) -> Option<Arc<LutModel>> {
        self.lock().remove(id).map(|e| e.lut)
    }

    /// True if an entry exists for `id`. Does not affect recency.
    pub fn contains(&self, id: &str) -> bool {
        self.lock().entries.contains_key(id)
    }

    /// Drops all entries. Statistics are kept.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Sum of entry footprints in bytes.
    pub fn total_size(&self) -> usize {
        self.lock().total_size
    }

    /// Ids from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let state = self.lock();
        let mut keys = Vec::with_capacity(state.entries.len());
        let mut cursor = state.lru_head.as_deref();
        while let Some(key) = cursor {
            keys.push(key.to_string());
            cursor = state.entries.get(key).and_then(|e| e.next.as_deref());
        }
        keys
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            entry_count: state.entries.len(),
            ..state.stats.clone()
        }
    }

    /// Tears the cache down, returning final statistics.
    pub fn shutdown(self) -> CacheStats {
        let mut state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        let stats = CacheStats {
            entry_count: state.entries.len(),
            ..state.stats.clone()
        };
        state.clear();
        debug!(hits = stats.hits, misses = stats.misses, evictions = stats.evictions, "LutCache::shutdown");
        stats
    }
}
