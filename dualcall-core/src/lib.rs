//! # dualcall-core — vocabulary for dual-mode calling conventions
//!
//! An operation can report completion in one of two styles:
//!
//! | Style | Shape | Completion |
//! |-------|-------|------------|
//! | Continuation | `op(args..., handler)` | the handler is called with `(error, results...)` |
//! | Deferred | `op(args...) -> Deferred` | the returned value settles later |
//!
//! This crate defines the types both styles share. The adapters that convert
//! between them live in the `dualcall` crate; a tokio-backed
//! [`DeferredFactory`] lives in `dualcall-tokio`.
//!
//! ## The Types
//!
//! | Type | What it is |
//! |------|-----------|
//! | [`Operation`] | An invocable value with a declared parameter count |
//! | [`Invocation`] | Receiver + positional arguments + optional handler slot |
//! | [`Callback`] | The once-only, error-first completion handler |
//! | [`Deferred`] | A future resolving to an [`Outcome`] |
//! | [`Settle`] | The resolve/reject side of a pending [`Deferred`] |
//! | [`DeferredFactory`] | Builds deferred values and schedules later turns |
//! | [`Output`] / [`Outcome`] | The normalized success payload / result |
//! | [`Fault`] | The error carried by a failed outcome |
//! | [`Operand`] | Anything handed to an adapter: operation, deferred, or data |
//!
//! ## Dependency Notes
//!
//! Positional data is `serde_json::Value`. Operations are dynamically
//! invoked with argument lists whose length is only known at call time, and
//! JSON is the lingua franca for such payloads. Typed access goes through
//! [`Output::deserialize`].

#![deny(missing_docs)]

pub mod callback;
pub mod deferred;
pub mod error;
pub mod operation;
pub mod value;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use callback::Callback;
pub use deferred::{Deferred, DeferredFactory, Executor, Settle, Task};
pub use error::{AdapterError, Fault};
pub use operation::{Invocation, Operand, Operation, Returned};
pub use value::{kind_of, Outcome, Output, Receiver, Value};
