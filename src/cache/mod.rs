//! Cache Module
//!
//! In-memory response caching with per-cache TTLs. Expiry is lazy: entries
//! are checked and cleared on read, there is no background sweep.

mod entry;
mod keyed;
mod single;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use keyed::{derive_key, KeyedCache};
pub use single::SingleCache;
pub use stats::CacheStats;

// == Public Constants ==
/// Delimiter used when deriving composite cache keys
pub const KEY_DELIMITER: char = '|';
