//! Replay Module
//!
//! Reads an operation's recorded history and renders one line per call.

use std::fmt;

use crate::cache::decode_str;
use crate::error::Result;
use crate::tracking::{inputs_key, outputs_key, Operation};

// == Call Record ==
/// One recorded call: rendered arguments and rendered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

// == Call Replay ==
/// Recorded history of one operation.
///
/// `Display` renders a header followed by `<name>(*<input>) -> <output>` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReplay {
    /// Qualified operation name
    pub name: String,
    /// Number of recorded inputs, orphaned ones included
    pub total_calls: usize,
    /// Input/output pairs in call order
    pub calls: Vec<CallRecord>,
}

impl fmt::Display for CallReplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.name, self.total_calls)?;
        for call in &self.calls {
            write!(f, "\n{}(*{}) -> {}", self.name, call.input, call.output)?;
        }
        Ok(())
    }
}

// == Replay ==
/// Reads the history of `op` without writing anything.
///
/// Inputs and outputs are paired by index; entries past the shorter list are dropped.
pub async fn replay<O: Operation + ?Sized>(op: &O) -> Result<CallReplay> {
    let name = op.qualified_name();
    let store = op.store();
    let inputs = store.lrange(&inputs_key(name), 0, -1).await?;
    let outputs = store.lrange(&outputs_key(name), 0, -1).await?;

    let total_calls = inputs.len();
    let calls = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| {
            Ok(CallRecord {
                input: decode_str(input)?,
                output: decode_str(output)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CallReplay {
        name: name.to_string(),
        total_calls,
        calls,
    })
}
