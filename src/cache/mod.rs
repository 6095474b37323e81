//! Bounded FIFO cache of per-query retrieval results.
//!
//! Keys are 128-bit fingerprints of the raw query string (see
//! [`crate::hashing::fingerprint`]). Eviction is strictly first-in-first-out:
//! once the map exceeds capacity, the oldest-*inserted* entry is removed, no
//! matter how often it was read. Entries carry no TTL; a repeated query is
//! served unchanged until evicted, even if the underlying index moved on.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::collections::VecDeque;

use tracing::warn;

use crate::constants::{DEFAULT_CACHE_CAPACITY, RETRIEVAL_POOL_SIZE};
use crate::hashing::{Fingerprint, fingerprint};
use crate::retrieval::Passage;

/// FIFO-bounded map from query fingerprint to the top-k passages returned for
/// that query at computation time.
pub struct FingerprintCache {
    entries: HashMap<Fingerprint, Vec<Passage>>,
    order: VecDeque<Fingerprint>,
    capacity: usize,
}

impl FingerprintCache {
    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Looks up results for a query. Entries failing shape validation are
    /// dropped and reported as a miss; the next computation overwrites them.
    pub fn get(&mut self, query: &str) -> Option<Vec<Passage>> {
        let key = fingerprint(query);

        let valid = match self.entries.get(&key) {
            None => return None,
            Some(results) => results.len() <= RETRIEVAL_POOL_SIZE,
        };

        if !valid {
            warn!(
                query_len = query.len(),
                "Dropping malformed cache entry (result list exceeds retrieval pool)"
            );
            self.remove(&key);
            return None;
        }

        self.entries.get(&key).cloned()
    }

    /// Stores results for a query, evicting the oldest entries if the cache
    /// grows past capacity. Re-inserting an existing key overwrites the value
    /// but keeps its original position in the eviction order.
    pub fn put(&mut self, query: &str, results: Vec<Passage>) {
        let key = fingerprint(query);

        if self.entries.insert(key, results).is_none() {
            self.order.push_back(key);
        }

        while self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    /// Removes and returns the oldest-inserted entry, if any.
    pub fn evict_oldest(&mut self) -> Option<(Fingerprint, Vec<Passage>)> {
        let key = self.order.pop_front()?;
        let value = self
            .entries
            .remove(&key)
            .expect("eviction order and entry map must stay in sync");
        Some((key, value))
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the cache holds an entry for `query`.
    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(&fingerprint(query))
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn remove(&mut self, key: &Fingerprint) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }

    /// Inserts a raw entry without shape checks. Test hook for exercising the
    /// corrupted-entry path in [`FingerprintCache::get`].
    #[cfg(test)]
    pub(crate) fn insert_raw(&mut self, query: &str, results: Vec<Passage>) {
        let key = fingerprint(query);
        if self.entries.insert(key, results).is_none() {
            self.order.push_back(key);
        }
    }
}

impl Default for FingerprintCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FingerprintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
