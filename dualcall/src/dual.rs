//! The dual-mode callable produced by both adapters.

use crate::adapter::Adapter;
use crate::arity::{fit, Style};
use crate::{breaker, make};
use dualcall_core::{Callback, Deferred, Operand, Operation, Receiver, Returned, Value};
use std::fmt;

/// A callable usable either with a trailing completion handler or as a
/// deferred-value call.
///
/// Positional arguments are fitted to [`arity`](DualFn::arity): missing ones
/// are padded with null and extra ones dropped, as for a function with a
/// fixed parameter list. The receiver is forwarded untouched.
#[derive(Clone)]
pub struct DualFn {
    adapter: Adapter,
    op: Operation,
    style: Style,
    arity: usize,
}

impl DualFn {
    pub(crate) fn new(adapter: Adapter, op: Operation, style: Style, arity: usize) -> Self {
        Self {
            adapter,
            op,
            style,
            arity,
        }
    }

    /// Number of positional arguments, excluding the handler slot.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The calling style of the wrapped operation.
    pub fn style(&self) -> Style {
        self.style
    }

    /// The wrapped operation.
    pub fn operation(&self) -> &Operation {
        &self.op
    }

    pub(crate) fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Call in either mode: with a handler, the outcome goes to it and
    /// `None` is returned; without one, a deferred value is returned.
    pub fn invoke(
        &self,
        receiver: &Receiver,
        args: Vec<Value>,
        callback: Option<Callback>,
    ) -> Option<Deferred> {
        match callback {
            Some(callback) => {
                self.call_with(receiver, args, callback);
                None
            }
            None => Some(self.call(receiver, args)),
        }
    }

    /// Deferred-mode call.
    pub fn call(&self, receiver: &Receiver, args: Vec<Value>) -> Deferred {
        let args = fit(args, self.arity);
        match self.style {
            Style::Continuation => make::deferred_mode(self, receiver, args),
            Style::Deferred => breaker::deferred_mode(self, receiver, args),
        }
    }

    /// Handler-mode call.
    pub fn call_with(&self, receiver: &Receiver, args: Vec<Value>, callback: Callback) {
        let args = fit(args, self.arity);
        match self.style {
            Style::Continuation => make::handler_mode(self, receiver, args, callback),
            Style::Deferred => breaker::handler_mode(self, receiver, args, callback),
        }
    }

    /// This callable as an [`Operation`] declaring `arity + 1` parameters
    /// (the positional ones plus the handler slot), so it can be adapted
    /// again or handed to the uniform invoker.
    ///
    /// [`Adapter::from_deferred`] takes the declared count as the logical
    /// arity, so it sees `arity + 1` positional arguments. Pass
    /// `ArityOverride::new(self.arity())` to
    /// [`Adapter::from_deferred_with`] to keep the original arity.
    pub fn to_operation(&self) -> Operation {
        let dual = self.clone();
        let op = Operation::new(self.arity + 1, move |inv| {
            Ok(match dual.invoke(&inv.receiver, inv.args, inv.callback) {
                Some(deferred) => Returned::Deferred(deferred),
                None => Returned::Absent,
            })
        });
        match self.op.name() {
            Some(name) => op.named(name),
            None => op,
        }
    }
}

impl From<DualFn> for Operation {
    fn from(dual: DualFn) -> Self {
        dual.to_operation()
    }
}

impl From<DualFn> for Operand {
    fn from(dual: DualFn) -> Self {
        Operand::Operation(dual.to_operation())
    }
}

impl fmt::Debug for DualFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualFn")
            .field("op", &self.op)
            .field("style", &self.style)
            .field("arity", &self.arity)
            .finish()
    }
}
