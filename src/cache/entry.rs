//! Cache Entry Module
//!
//! Defines a single cached value together with the instant it was stored.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A cached value and its creation time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was stored
    pub created_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: V) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry is older than `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is expired, so
    /// a fresh entry always satisfies `age < ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}
