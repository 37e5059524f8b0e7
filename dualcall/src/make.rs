//! "make": turn a continuation-style operation into a dual-mode callable.

use crate::adapter::Adapter;
use crate::arity::{logical_arity, ArityOverride, Style};
use crate::dual::DualFn;
use dualcall_core::{AdapterError, Callback, Deferred, Invocation, Operand, Receiver, Value};

impl Adapter {
    /// Adapt a continuation-style operation. Its logical arity is the
    /// declared arity minus the trailing handler slot.
    ///
    /// Fails with [`AdapterError::FunctionRequired`] if `target` is not an
    /// operation. A missing deferred implementation is only reported when a
    /// deferred-mode call needs one.
    pub fn from_continuation(&self, target: impl Into<Operand>) -> Result<DualFn, AdapterError> {
        self.make(None, target.into())
    }

    /// Like [`from_continuation`](Self::from_continuation), with `arity`
    /// replacing the declared parameter count (handler slot included).
    pub fn from_continuation_with(
        &self,
        arity: ArityOverride,
        target: impl Into<Operand>,
    ) -> Result<DualFn, AdapterError> {
        self.make(Some(arity), target.into())
    }

    fn make(&self, arity: Option<ArityOverride>, target: Operand) -> Result<DualFn, AdapterError> {
        let op = target.into_operation()?;
        let logical = logical_arity(&op, arity, Style::Continuation);
        Ok(DualFn::new(self.clone(), op, Style::Continuation, logical))
    }
}

/// Forward the caller's handler straight to the operation. Its return value
/// is discarded; an error it returns goes to the handler unless the handler
/// already fired.
pub(crate) fn handler_mode(dual: &DualFn, receiver: &Receiver, args: Vec<Value>, callback: Callback) {
    let inv = Invocation::new(receiver.clone(), args).with_callback(callback.clone());
    if let Err(fault) = dual.operation().invoke(inv) {
        callback.fail(fault);
    }
}

/// Run the operation with a synthesized handler that settles a new deferred
/// value.
pub(crate) fn deferred_mode(dual: &DualFn, receiver: &Receiver, args: Vec<Value>) -> Deferred {
    let op = dual.operation().clone();
    let receiver = receiver.clone();
    dual.adapter().deferred_from(move |callback| {
        let inv = Invocation::new(receiver, args).with_callback(callback.clone());
        if let Err(fault) = op.invoke(inv) {
            callback.fail(fault);
        }
    })
}
