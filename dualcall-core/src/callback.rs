//! The error-first completion handler.

use crate::error::Fault;
use crate::value::{Outcome, Output, Value};
use std::fmt;
use std::sync::{Arc, Mutex};

type Slot = Box<dyn FnOnce(Option<Fault>, Vec<Value>) + Send>;

/// A trailing completion handler: `(error, results...)`.
///
/// An error in the first slot means failure; otherwise the remaining
/// arguments are the results. A callback fires at most once. Clones share
/// the same slot, so a callee that reports twice (through any clone) has its
/// second report ignored.
#[derive(Clone)]
pub struct Callback {
    slot: Arc<Mutex<Option<Slot>>>,
}

impl Callback {
    /// Wrap an error-first closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Option<Fault>, Vec<Value>) + Send + 'static,
    {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(f)))),
        }
    }

    /// Wrap a closure that wants the normalized [`Outcome`] instead of the
    /// raw argument list.
    pub fn from_outcome<F>(f: F) -> Self
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        Self::new(move |error, results| match error {
            Some(fault) => f(Err(fault)),
            None => f(Ok(Output::pack(results))),
        })
    }

    /// Invoke the handler. Returns `false` if it had already fired.
    pub fn call(&self, error: Option<Fault>, results: Vec<Value>) -> bool {
        let slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match slot {
            Some(f) => {
                f(error, results);
                true
            }
            None => {
                tracing::warn!(
                    failed = error.is_some(),
                    results = results.len(),
                    "dualcall.callback.ignored"
                );
                false
            }
        }
    }

    /// Report a single result.
    pub fn succeed(&self, value: impl Into<Value>) -> bool {
        self.call(None, vec![value.into()])
    }

    /// Report any number of results.
    pub fn succeed_with(&self, results: Vec<Value>) -> bool {
        self.call(None, results)
    }

    /// Report a failure.
    pub fn fail(&self, fault: impl Into<Fault>) -> bool {
        self.call(Some(fault.into()), Vec::new())
    }

    /// Report a normalized outcome. A sequence is spread back into separate
    /// results, so `(None, a, b)` round-trips through [`Output::pack`].
    pub fn settle(&self, outcome: Outcome) -> bool {
        match outcome {
            Ok(output) => self.call(None, output.unpack()),
            Err(fault) => self.call(Some(fault), Vec::new()),
        }
    }

    /// Whether the handler has already fired.
    pub fn is_spent(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("spent", &self.is_spent())
            .finish()
    }
}
