//! Deferred values and the factory capability that constructs them.

use crate::callback::Callback;
use crate::error::{AdapterError, Fault};
use crate::value::{Outcome, Output};
use futures::channel::oneshot;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

/// A result that is not available yet.
///
/// `Deferred` is a future resolving to an [`Outcome`]. Awaiting it is how
/// settlement observers are attached; it settles exactly once.
pub struct Deferred {
    inner: BoxFuture<'static, Outcome>,
}

impl Deferred {
    /// Wrap any future producing an outcome.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        Self {
            inner: future.boxed(),
        }
    }

    /// An already resolved deferred value.
    pub fn resolved(output: impl Into<Output>) -> Self {
        Self::from_future(futures::future::ready(Ok(output.into())))
    }

    /// An already rejected deferred value.
    pub fn rejected(fault: impl Into<Fault>) -> Self {
        Self::from_future(futures::future::ready(Err(fault.into())))
    }

    /// A pending deferred value and the handle that settles it.
    ///
    /// If every clone of the handle is dropped without settling, the
    /// deferred value rejects with [`AdapterError::HandlerDropped`].
    pub fn channel() -> (Settle, Deferred) {
        let (tx, rx) = oneshot::channel();
        let settle = Settle {
            tx: Arc::new(Mutex::new(Some(tx))),
        };
        let deferred = Self::from_future(async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(oneshot::Canceled) => Err(AdapterError::HandlerDropped.into()),
            }
        });
        (settle, deferred)
    }
}

impl Future for Deferred {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome> {
        self.inner.as_mut().poll(cx)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

/// The settlement side of a [`Deferred::channel`]: a resolve/reject pair.
///
/// The first settlement wins; later ones return `false` and are ignored.
#[derive(Clone)]
pub struct Settle {
    tx: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

impl Settle {
    /// Settle with an outcome.
    pub fn settle(&self, outcome: Outcome) -> bool {
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match tx {
            // A dropped receiver means nobody is observing; the settlement
            // still counts as the first one.
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    /// Resolve with a success payload.
    pub fn resolve(&self, output: impl Into<Output>) -> bool {
        self.settle(Ok(output.into()))
    }

    /// Reject with a fault.
    pub fn reject(&self, fault: impl Into<Fault>) -> bool {
        self.settle(Err(fault.into()))
    }

    /// Whether a settlement already happened.
    pub fn is_settled(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }

    /// A completion handler that settles this deferred value.
    ///
    /// A fault in the error slot rejects; otherwise the remaining arguments
    /// are packed with [`Output::pack`] and resolve.
    pub fn callback(&self) -> Callback {
        let settle = self.clone();
        Callback::new(move |error, results| {
            match error {
                Some(fault) => settle.reject(fault),
                None => settle.resolve(Output::pack(results)),
            };
        })
    }
}

impl fmt::Debug for Settle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settle")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// The body run when a deferred value is constructed.
pub type Executor = Box<dyn FnOnce(Settle) + Send>;

/// A unit of work to run on a fresh asynchronous turn.
pub type Task = BoxFuture<'static, ()>;

/// The capability to build deferred values and to schedule work on a later
/// asynchronous turn.
///
/// Implementations decide where scheduled tasks run. A task must never run
/// inline inside [`schedule`](DeferredFactory::schedule): completion handlers
/// are delivered through it precisely so that a panic raised by the handler
/// escapes to the top level instead of unwinding through the caller.
pub trait DeferredFactory: Send + Sync {
    /// A short name for logs and error messages.
    fn name(&self) -> &str;

    /// Check that the implementation is usable.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Build a deferred value, running `executor` immediately with its
    /// settlement handle. A panicking executor rejects the value.
    fn construct(&self, executor: Executor) -> Deferred {
        let (settle, deferred) = Deferred::channel();
        let handle = settle.clone();
        if let Err(payload) = std::panic::catch_unwind(AssertUnwindSafe(move || executor(handle))) {
            settle.reject(Fault::from_panic(payload));
        }
        deferred
    }

    /// Run `task` on a fresh asynchronous turn.
    fn schedule(&self, task: Task);
}

impl fmt::Debug for dyn DeferredFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredFactory")
            .field("name", &self.name())
            .finish()
    }
}
