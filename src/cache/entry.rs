//! Cache Entry Module
//!
//! Defines the value/timestamp pair stored by both cache types. The payload
//! is opaque to the cache layer.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached value with its validity window.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored payload
    pub value: T,
    /// Creation timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped at the current time, valid for `ttl`.
    pub fn new(value: T, ttl: Duration) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            stored_at: now,
            expires_at: now.saturating_add(ttl.as_millis() as u64),
        }
    }

    // == Is Expired ==
    /// Checks whether the validity window has elapsed.
    ///
    /// An entry is expired once the current time reaches `expires_at`, i.e.
    /// valid iff `now - stored_at < ttl`.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_fresh() {
        let entry = CacheEntry::new("payload", Duration::from_secs(60));
        assert_eq!(entry.value, "payload");
        assert!(!entry.is_expired());
        assert_eq!(entry.expires_at - entry.stored_at, 60_000);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new(1u32, Duration::from_millis(30));
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(60));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new((), Duration::from_secs(0));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary() {
        // Expired exactly when now reaches expires_at
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: "boundary",
            stored_at: now,
            expires_at: now,
        };
        assert!(entry.is_expired());
    }
}
