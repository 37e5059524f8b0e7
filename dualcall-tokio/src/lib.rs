#![deny(missing_docs)]
//! Tokio-backed implementation of dualcall-core's [`DeferredFactory`].
//!
//! Deferred values are the runtime-agnostic channel from `dualcall-core`;
//! what tokio contributes is the "fresh asynchronous turn": every scheduled
//! task is spawned as its own tokio task. A completion handler that panics
//! therefore takes down only its own task, and the panic surfaces through
//! tokio's unhandled-panic reporting rather than through the adapter.

use dualcall_core::deferred::{DeferredFactory, Task};
use tokio::runtime::Handle;

/// Where a [`TokioFactory`] spawns its tasks.
#[derive(Debug, Clone)]
enum Target {
    /// A specific runtime.
    Handle(Handle),
    /// Whatever runtime is current when a task is scheduled.
    Current,
}

/// A [`DeferredFactory`] that schedules turns as tokio tasks.
///
/// Bound either to a specific runtime handle or to "the current runtime",
/// which is looked up on every [`schedule`](DeferredFactory::schedule).
/// Scheduling from outside any runtime with the latter falls back to a
/// dedicated thread, so no task is ever lost.
#[derive(Debug, Clone)]
pub struct TokioFactory {
    target: Target,
}

impl TokioFactory {
    /// Spawn onto a specific runtime.
    pub fn new(handle: Handle) -> Self {
        Self {
            target: Target::Handle(handle),
        }
    }

    /// Spawn onto whatever runtime is current at scheduling time.
    pub fn current_runtime() -> Self {
        Self {
            target: Target::Current,
        }
    }

    /// A factory bound to the runtime the caller is running in, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Whether a runtime is reachable from the calling context.
    pub fn runtime_available() -> bool {
        Handle::try_current().is_ok()
    }
}

impl DeferredFactory for TokioFactory {
    fn name(&self) -> &str {
        "tokio"
    }

    fn validate(&self) -> Result<(), String> {
        match &self.target {
            Target::Handle(_) => Ok(()),
            Target::Current if Self::runtime_available() => Ok(()),
            Target::Current => Err("no tokio runtime is running on this thread".into()),
        }
    }

    fn schedule(&self, task: Task) {
        let handle = match &self.target {
            Target::Handle(handle) => Some(handle.clone()),
            Target::Current => Handle::try_current().ok(),
        };
        match handle {
            Some(handle) => {
                tracing::trace!("dualcall.tokio.schedule");
                drop(handle.spawn(task));
            }
            None => {
                tracing::debug!("dualcall.tokio.schedule_detached");
                std::thread::spawn(move || futures::executor::block_on(task));
            }
        }
    }
}
