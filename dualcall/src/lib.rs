//! # dualcall — one operation, two calling conventions
//!
//! An asynchronous operation either takes a trailing completion handler
//! (`op(args..., handler)`, handler called as `(error, results...)`) or
//! returns a deferred value. This crate converts between the two so a
//! library can offer both without committing to either.
//!
//! | Entry point | What it does |
//! |-------------|-------------|
//! | [`Adapter::from_continuation`] | continuation-style op → [`DualFn`] |
//! | [`Adapter::from_deferred`] | deferred-style op → [`DualFn`] |
//! | [`Adapter::add_deferred`] | "return a deferred value unless a handler was given" |
//! | [`Adapter::add_callback`] | "deliver to the handler if one was given" |
//! | [`Adapter::apply_fn`] and friends | call an op whose style is unknown |
//!
//! ## Success payloads
//!
//! A handler may report zero, one or several results. Deferred values carry
//! them as an [`Output`]: `Absent`, `Single(v)` or `Sequence(vs)`. Going back
//! to handler form spreads a sequence into separate results again.
//!
//! ## The deferred implementation
//!
//! Deferred values are built, and later turns scheduled, by a
//! [`DeferredFactory`]. Bind one explicitly with [`Adapter::bind`], or let
//! the adapter resolve the ambient default lazily (see [`registry`]).
//! Completion handlers always run on a scheduled turn, never inside the
//! settlement that produced their outcome.
//!
//! ## Quick Start
//!
//! ```ignore
//! use dualcall::prelude::*;
//! use serde_json::json;
//!
//! let add = Operation::continuation(2, |_, args, cb| {
//!     let sum = args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0);
//!     cb.succeed(json!(sum));
//! });
//! let add = default_adapter().from_continuation(add)?;
//!
//! // Deferred mode.
//! let sum = add.call(&Receiver::none(), vec![json!(3), json!(5)]).await?;
//! assert_eq!(sum, Output::Single(json!(8)));
//!
//! // Handler mode.
//! add.call_with(&Receiver::none(), vec![json!(3), json!(5)], Callback::from_outcome(|outcome| {
//!     println!("{outcome:?}");
//! }));
//! ```

#![deny(missing_docs)]

pub mod adapter;
pub mod arity;
mod breaker;
mod bridge;
pub mod config;
pub mod dual;
mod invoke;
mod make;
pub mod registry;

pub use dualcall_core;
#[cfg(feature = "tokio")]
pub use dualcall_tokio;

pub use adapter::{default_adapter, Adapter};
pub use arity::{effective_arity, logical_arity, ArityOverride, Style};
pub use config::AdapterConfig;
pub use dual::DualFn;
pub use registry::{install_default, installed_default, resolve_default};

pub use dualcall_core::{
    kind_of, AdapterError, Callback, Deferred, DeferredFactory, Executor, Fault, Invocation,
    Operand, Operation, Outcome, Output, Receiver, Returned, Settle, Task, Value,
};

#[cfg(feature = "tokio")]
pub use dualcall_tokio::TokioFactory;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        default_adapter, Adapter, AdapterConfig, AdapterError, ArityOverride, Callback, Deferred,
        DeferredFactory, DualFn, Fault, Invocation, Operation, Outcome, Output, Receiver, Returned, Value,
    };
}
