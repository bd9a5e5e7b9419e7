//! Stored Value Module
//!
//! Scalar values accepted by `Cache::store` and the decoders used to read them back.

use std::fmt;

use crate::error::{CacheError, Result};

// == Stored Value ==
/// A scalar written to the store.
///
/// The `Debug` form is the canonical rendering used in call history:
/// `"text"`, `b"bytes"`, `42`, `3.5`.
#[derive(Clone, PartialEq)]
pub enum StoredValue {
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl StoredValue {
    /// Encodes the value as the bytes written to the store.
    ///
    /// Numbers are written as decimal text so the store can INCR them.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StoredValue::Str(s) => s.as_bytes().to_vec(),
            StoredValue::Bytes(b) => b.clone(),
            StoredValue::Int(i) => i.to_string().into_bytes(),
            StoredValue::Float(f) => f.to_string().into_bytes(),
        }
    }
}

impl fmt::Debug for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Str(s) => write!(f, "{:?}", s),
            StoredValue::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            StoredValue::Int(i) => write!(f, "{}", i),
            StoredValue::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Str(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Str(value)
    }
}

impl From<&[u8]> for StoredValue {
    fn from(value: &[u8]) -> Self {
        StoredValue::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(value: Vec<u8>) -> Self {
        StoredValue::Bytes(value)
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Int(value)
    }
}

impl From<i32> for StoredValue {
    fn from(value: i32) -> Self {
        StoredValue::Int(i64::from(value))
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Float(value)
    }
}

// == Decoders ==
/// Decodes stored bytes as UTF-8 text.
pub fn decode_str(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| CacheError::Decode(format!("Invalid UTF-8: {}", e)))
}

/// Decodes stored bytes as a decimal integer.
pub fn decode_int(raw: Vec<u8>) -> Result<i64> {
    let text = decode_str(raw)?;
    text.trim()
        .parse()
        .map_err(|_| CacheError::Decode(format!("Not an integer: {:?}", text)))
}

/// Decodes stored bytes as a floating point number.
pub fn decode_float(raw: Vec<u8>) -> Result<f64> {
    let text = decode_str(raw)?;
    text.trim()
        .parse()
        .map_err(|_| CacheError::Decode(format!("Not a float: {:?}", text)))
}
