//! Store Entry Module
//!
//! Defines the in-memory representation of a stored key with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Entry Data ==
/// The two value kinds the store commands operate on.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    /// Plain value written by SET / SETEX / INCR
    Bytes(Vec<u8>),
    /// Ordered sequence written by RPUSH
    List(Vec<Vec<u8>>),
}

// == Store Entry ==
/// A single stored key with its value and expiry metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub data: EntryData,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with an optional TTL.
    ///
    /// TTLs too large to represent saturate to "never expires in practice".
    pub fn new(data: EntryData, ttl: Option<Duration>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| {
            let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            now.saturating_add(ttl_ms)
        });

        Self { data, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
