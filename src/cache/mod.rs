//! Cache Module
//!
//! Stores scalar values under random keys and retrieves them with optional decoding.

mod store;
mod value;


// Re-export public types
pub use store::{Cache, StoreOperation, TrackedStore, STORE_OPERATION};
pub use value::{decode_float, decode_int, decode_str, StoredValue};
