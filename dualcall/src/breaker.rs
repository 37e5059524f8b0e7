//! "break": turn a deferred-style operation into a dual-mode callable.

use crate::adapter::Adapter;
use crate::arity::{logical_arity, ArityOverride, Style};
use crate::dual::DualFn;
use dualcall_core::{AdapterError, Callback, Deferred, Invocation, Operand, Receiver, Value};

impl Adapter {
    /// Adapt a deferred-style operation. Its logical arity is its declared
    /// arity.
    ///
    /// Fails with [`AdapterError::FunctionRequired`] if `target` is not an
    /// operation.
    pub fn from_deferred(&self, target: impl Into<Operand>) -> Result<DualFn, AdapterError> {
        self.unmake(None, target.into())
    }

    /// Like [`from_deferred`](Self::from_deferred), with `arity` replacing
    /// the declared parameter count.
    pub fn from_deferred_with(
        &self,
        arity: ArityOverride,
        target: impl Into<Operand>,
    ) -> Result<DualFn, AdapterError> {
        self.unmake(Some(arity), target.into())
    }

    fn unmake(&self, arity: Option<ArityOverride>, target: Operand) -> Result<DualFn, AdapterError> {
        let op = target.into_operation()?;
        let logical = logical_arity(&op, arity, Style::Deferred);
        Ok(DualFn::new(self.clone(), op, Style::Deferred, logical))
    }
}

/// Call the operation and hand back whatever it returned, as a deferred
/// value. An error returned synchronously becomes a rejection.
pub(crate) fn deferred_mode(dual: &DualFn, receiver: &Receiver, args: Vec<Value>) -> Deferred {
    match dual.operation().invoke(Invocation::new(receiver.clone(), args)) {
        Ok(returned) => returned.into_deferred(),
        Err(fault) => Deferred::rejected(fault),
    }
}

/// Call the operation and deliver its outcome to the handler on a later
/// turn.
pub(crate) fn handler_mode(dual: &DualFn, receiver: &Receiver, args: Vec<Value>, callback: Callback) {
    let deferred = deferred_mode(dual, receiver, args);
    dual.adapter().deliver(deferred, callback);
}
