//! Cache Module
//!
//! In-process read cache with a single global TTL and lazy expiry.

mod entry;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use store::CacheStore;

// == Public Constants ==
/// Key under which the most recent book listing is cached
pub const BOOKS_CACHE_KEY: &str = "booksData";

/// Default TTL for cached listings in seconds
pub const DEFAULT_TTL_SECS: u64 = 3600;
