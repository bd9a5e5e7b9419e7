//! Error types for the cache wrappers
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the store, cache and page cache layers.
///
/// A missing key is not an error: lookups return `Ok(None)` instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The key-value store could not be reached or rejected a command
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    /// A command was applied to a key holding the wrong kind of value
    #[error("Wrong type: {0}")]
    WrongType(String),

    /// Stored bytes could not be decoded into the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// A page could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache wrappers.
pub type Result<T> = std::result::Result<T, CacheError>;
