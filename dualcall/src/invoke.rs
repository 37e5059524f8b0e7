//! The uniform invoker: call an operation of unknown style with a known
//! logical argument count.
//!
//! The style is decided per call from the operation's declared arity:
//!
//! | Declared | Treated as |
//! |----------|-----------|
//! | `count + 1` | continuation (the extra slot is the handler) |
//! | `<= count` | deferred (plain return values count as resolved) |
//! | `> count + 1` | [`AdapterError::ArityMismatch`], the operation is never invoked |
//!
//! Errors and panics raised while invoking are captured into the outcome and
//! never escape the invoker.

use crate::adapter::Adapter;
use crate::arity::{fit, pad, Style};
use dualcall_core::{AdapterError, Callback, Deferred, Invocation, Operation, Receiver, Value};

impl Adapter {
    /// Invoke `op` as if it took `count` positional arguments.
    ///
    /// Missing arguments are padded with null up to the operation's declared
    /// parameters (never past `count`). With a handler, the outcome
    /// is delivered to it on a later turn and `None` is returned; otherwise
    /// a deferred value is returned.
    pub fn apply_fn(
        &self,
        op: &Operation,
        count: usize,
        receiver: &Receiver,
        args: Vec<Value>,
        callback: Option<Callback>,
    ) -> Option<Deferred> {
        let deferred = self.outcome_of(op, count, receiver, args);
        match callback {
            Some(callback) => {
                self.deliver(deferred, callback);
                None
            }
            None => Some(deferred),
        }
    }

    /// [`apply_fn`](Self::apply_fn) with the count taken from `args`.
    pub fn apply(
        &self,
        op: &Operation,
        receiver: &Receiver,
        args: Vec<Value>,
        callback: Option<Callback>,
    ) -> Option<Deferred> {
        let count = args.len();
        self.apply_fn(op, count, receiver, args, callback)
    }

    /// [`apply_fn`](Self::apply_fn) for a flattened argument list: only the
    /// first `count` arguments are positional, anything after is dropped.
    pub fn call_fn(
        &self,
        op: &Operation,
        count: usize,
        receiver: &Receiver,
        mut args: Vec<Value>,
        callback: Option<Callback>,
    ) -> Option<Deferred> {
        args.truncate(count);
        self.apply_fn(op, count, receiver, args, callback)
    }

    /// Deferred-mode shorthand: every argument is positional.
    pub fn call(&self, op: &Operation, receiver: &Receiver, args: Vec<Value>) -> Deferred {
        let count = args.len();
        self.outcome_of(op, count, receiver, args)
    }

    /// Handler-mode shorthand: every argument is positional and the outcome
    /// goes to `callback`.
    ///
    /// Fails with [`AdapterError::HandlerRequired`] when no handler is given,
    /// before `op` is invoked.
    pub fn call_with_callback(
        &self,
        op: &Operation,
        receiver: &Receiver,
        args: Vec<Value>,
        callback: Option<Callback>,
    ) -> Result<(), AdapterError> {
        let callback = callback.ok_or(AdapterError::HandlerRequired)?;
        let count = args.len();
        let deferred = self.outcome_of(op, count, receiver, args);
        self.deliver(deferred, callback);
        Ok(())
    }

    fn outcome_of(
        &self,
        op: &Operation,
        count: usize,
        receiver: &Receiver,
        args: Vec<Value>,
    ) -> Deferred {
        let declared = op.declared_arity();
        let style = match Style::infer(declared, count) {
            Ok(style) => style,
            Err(err) => {
                tracing::debug!(
                    operation = op.name().unwrap_or("<anonymous>"),
                    declared,
                    expected = count,
                    "dualcall.invoke.arity_mismatch"
                );
                return Deferred::rejected(err);
            }
        };
        match style {
            Style::Continuation => {
                let op = op.clone();
                let receiver = receiver.clone();
                let args = fit(args, count);
                self.deferred_from(move |callback| {
                    let inv = Invocation::new(receiver, args).with_callback(callback.clone());
                    match op.invoke(inv) {
                        Ok(returned) if !returned.is_absent() => {
                            tracing::debug!(
                                operation = op.name().unwrap_or("<anonymous>"),
                                "dualcall.invoke.return_ignored"
                            );
                        }
                        Ok(_) => {}
                        Err(fault) => {
                            callback.fail(fault);
                        }
                    }
                })
            }
            Style::Deferred => {
                // declared <= count here.
                let args = pad(args, declared);
                match op.invoke_caught(Invocation::new(receiver.clone(), args)) {
                    Ok(returned) => returned.into_deferred(),
                    Err(fault) => Deferred::rejected(fault),
                }
            }
        }
    }
}
