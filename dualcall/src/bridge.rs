//! The two bridges between calling styles.
//!
//! [`Adapter::add_deferred`] lets a function that starts work by handing out
//! a completion handler also serve deferred-mode callers.
//! [`Adapter::add_callback`] lets a function that produces a deferred value
//! (or a zero-argument function producing one) also serve handler-mode
//! callers.
//!
//! Handlers are never called inside the settlement itself. Delivery takes
//! two scheduled turns: one that waits for the outcome and one that calls
//! the handler, so a panic raised by the handler escapes to the top level
//! instead of unwinding into whatever settled the value.

use crate::adapter::Adapter;
use dualcall_core::{
    kind_of, AdapterError, Callback, Deferred, Invocation, Operand, Operation,
};

impl Adapter {
    /// Normalize a handler-initiated operation into deferred form.
    ///
    /// With a handler, `init` is called with it directly and nothing is
    /// returned. Without one, a deferred value is constructed, `init` is
    /// called with a synthesized handler that settles it, and the deferred
    /// value is returned.
    ///
    /// ```ignore
    /// fn read(adapter: &Adapter, done: Option<Callback>) -> Option<Deferred> {
    ///     adapter.add_deferred(done, |cb| {
    ///         cb.succeed(json!("contents"));
    ///     })
    /// }
    /// ```
    pub fn add_deferred<F>(&self, callback: Option<Callback>, init: F) -> Option<Deferred>
    where
        F: FnOnce(Callback) + Send + 'static,
    {
        match callback {
            Some(callback) => {
                init(callback);
                None
            }
            None => Some(self.deferred_from(init)),
        }
    }

    /// Normalize a deferred value, or a zero-argument function producing
    /// one, into handler form.
    ///
    /// A function source is started on the next scheduled turn whether or
    /// not the returned deferred value is ever awaited. An error it returns
    /// (or a panic) becomes a rejection. Plain data is rejected with
    /// [`AdapterError::UnknownSource`] before anything runs.
    ///
    /// With a handler, the outcome is delivered to it on a later turn and
    /// `Ok(None)` is returned; otherwise the deferred value is returned.
    pub fn add_callback(
        &self,
        callback: Option<Callback>,
        source: impl Into<Operand>,
    ) -> Result<Option<Deferred>, AdapterError> {
        let deferred = match source.into() {
            Operand::Deferred(deferred) => deferred,
            Operand::Operation(op) => self.start_thunk(op),
            Operand::Value(value) => {
                return Err(AdapterError::UnknownSource {
                    kind: kind_of(&value),
                });
            }
        };
        match callback {
            Some(callback) => {
                self.deliver(deferred, callback);
                Ok(None)
            }
            None => Ok(Some(deferred)),
        }
    }

    /// Construct a deferred value whose settlement is driven by a handler.
    /// Without a resolvable factory the value is already rejected.
    pub(crate) fn deferred_from<F>(&self, init: F) -> Deferred
    where
        F: FnOnce(Callback) + Send + 'static,
    {
        match self.factory() {
            Ok(factory) => factory.construct(Box::new(move |settle| init(settle.callback()))),
            Err(err) => Deferred::rejected(err),
        }
    }

    /// Run a zero-argument function source on a fresh turn and expose its
    /// outcome as a deferred value.
    fn start_thunk(&self, op: Operation) -> Deferred {
        let (settle, deferred) = Deferred::channel();
        match self.factory() {
            Ok(factory) => factory.schedule(Box::pin(async move {
                let outcome = match op.invoke_caught(Invocation::default()) {
                    Ok(returned) => returned.into_deferred().await,
                    Err(fault) => Err(fault),
                };
                settle.settle(outcome);
            })),
            Err(err) => {
                settle.reject(err);
            }
        }
        deferred
    }

    /// Deliver the outcome of `deferred` to `callback` on a fresh turn.
    ///
    /// Without a resolvable factory there is nothing to schedule on, so the
    /// handler receives the resolution error directly.
    pub(crate) fn deliver(&self, deferred: Deferred, callback: Callback) {
        let factory = match self.factory() {
            Ok(factory) => factory,
            Err(err) => {
                callback.fail(err);
                return;
            }
        };
        tracing::trace!(factory = factory.name(), "dualcall.bridge.deliver");
        let turn = factory.clone();
        factory.schedule(Box::pin(async move {
            let outcome = deferred.await;
            turn.schedule(Box::pin(async move {
                callback.settle(outcome);
            }));
        }));
    }
}

