//! Cache Store Module
//!
//! Keyed storage of cache entries sharing one TTL. Expired entries are
//! dropped when they are read; nothing sweeps in the background.
//!
//! Every `delete` bumps a generation counter. A reader that fetched a value
//! from the store before an invalidation can pass the generation it saw to
//! `set_if_current`, which refuses to cache the now-outdated value.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::CacheEntry;

// == Cache Store ==
/// Key-value storage with a fixed time-to-live for every entry.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Lifetime of every entry
    ttl: Duration,
    /// Incremented on every delete
    generation: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            generation: 0,
        }
    }

    /// Creates an empty store with a TTL given in whole seconds.
    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        Self::new(Duration::from_secs(ttl_secs))
    }

    // == Get ==
    /// Returns a copy of the value stored under `key` if it is still fresh.
    ///
    /// A stale entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = self.entries.get(key)?.is_expired(self.ttl);

        if expired {
            self.entries.remove(key);
            return None;
        }

        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and
    /// starting a new TTL window.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), CacheEntry::new(value));
    }

    // == Set If Current ==
    /// Stores `value` only if no delete happened since `generation` was read.
    ///
    /// Returns whether the value was stored.
    pub fn set_if_current(&mut self, key: impl Into<String>, value: V, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.set(key, value);
        true
    }

    // == Delete ==
    /// Removes the entry for `key` and starts a new generation, even when
    /// nothing was stored. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.generation += 1;
        self.entries.remove(key).is_some()
    }

    /// Current invalidation generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // == Length ==
    /// Returns the number of stored entries, including stale ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
