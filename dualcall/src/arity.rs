//! Arity inspection and style inference.
//!
//! An operation's declared arity counts every parameter, including the
//! trailing handler slot of a continuation-style operation. The logical
//! arity is the number of positional arguments a caller supplies.

use dualcall_core::{AdapterError, Operation, Value};
use serde::{Deserialize, Serialize};

/// Replaces the inferred parameter count of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArityOverride {
    /// The parameter count to use instead of the declared one.
    pub count: usize,
}

impl ArityOverride {
    /// An override with the given count.
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

/// The calling style an operation is treated as for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Takes a trailing completion handler.
    Continuation,
    /// Returns a deferred value (or a plain value).
    Deferred,
}

impl Style {
    /// Classify an operation declaring `declared` parameters, called with a
    /// logical argument count of `logical`.
    ///
    /// `declared == logical + 1` means the extra slot is the handler.
    /// Fewer is deferred-style (ignoring trailing arguments is allowed).
    /// More cannot be satisfied.
    pub fn infer(declared: usize, logical: usize) -> Result<Self, AdapterError> {
        // Compare the parameters before the would-be handler slot, so a
        // logical count of `usize::MAX` cannot overflow.
        match declared.checked_sub(1) {
            Some(leading) if leading > logical => Err(AdapterError::ArityMismatch {
                expected: logical,
                declared,
            }),
            Some(leading) if leading == logical => Ok(Self::Continuation),
            _ => Ok(Self::Deferred),
        }
    }
}

/// The declared parameter count of `op`, or the override when one is given.
pub fn effective_arity(op: &Operation, arity: Option<ArityOverride>) -> usize {
    arity.map_or_else(|| op.declared_arity(), |o| o.count)
}

/// The logical arity of `op` treated as `style`: a continuation's trailing
/// handler slot is not a positional argument.
pub fn logical_arity(op: &Operation, arity: Option<ArityOverride>, style: Style) -> usize {
    let count = effective_arity(op, arity);
    match style {
        Style::Continuation => count.saturating_sub(1),
        Style::Deferred => count,
    }
}

/// Right-pad `args` with nulls up to `len`. Longer lists are left intact.
pub(crate) fn pad(mut args: Vec<Value>, len: usize) -> Vec<Value> {
    if args.len() < len {
        args.resize(len, Value::Null);
    }
    args
}

/// Fit `args` to exactly `len` positions: pad with nulls, drop extras.
pub(crate) fn fit(mut args: Vec<Value>, len: usize) -> Vec<Value> {
    args.truncate(len);
    pad(args, len)
}
