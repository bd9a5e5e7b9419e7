//! Call Tracking Module
//!
//! Wraps an operation with store-side bookkeeping: a call counter keyed by the
//! operation's qualified name and parallel input/output history lists.
//!
//! # Keys
//! - `<name>` - number of invocations
//! - `<name>:inputs` - rendered positional arguments, one entry per call
//! - `<name>:outputs` - rendered results, one entry per successful call

mod middleware;
mod replay;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::decode_int;
use crate::error::Result;
use crate::store::KeyValueStore;

pub use middleware::{CountingMiddleware, HistoryMiddleware};
pub use replay::{replay, CallRecord, CallReplay};

// == Operation ==
/// A named operation of a component that owns a store handle.
///
/// Middlewares implement this trait too, delegating to an inner operation, so
/// they compose in any order.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Positional arguments; the `Debug` form is what history records.
    type Input: fmt::Debug + Send + 'static;
    /// Result; the `Display` form is what history records.
    type Output: fmt::Display + Send + 'static;

    /// Stable name used as the root of the operation's keys.
    fn qualified_name(&self) -> &str;

    /// Store holding the operation's counter and history.
    fn store(&self) -> &Arc<dyn KeyValueStore>;

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output>;
}

/// Key of the list recording call inputs.
pub fn inputs_key(name: &str) -> String {
    format!("{}:inputs", name)
}

/// Key of the list recording call outputs.
pub fn outputs_key(name: &str) -> String {
    format!("{}:outputs", name)
}

// == Call Count ==
/// Reads how many times `op` was invoked through a `CountingMiddleware`.
///
/// Returns 0 when the counter was never written.
pub async fn call_count<O: Operation + ?Sized>(op: &O) -> Result<i64> {
    match op.store().get(op.qualified_name()).await? {
        Some(raw) => decode_int(raw),
        None => Ok(0),
    }
}
