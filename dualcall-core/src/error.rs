//! Error types: wiring errors raised by the adapter, and the [`Fault`] that
//! travels the failure channel of either calling style.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the adapter itself.
///
/// Wiring mistakes (`FunctionRequired`, `InvalidDeferredImplementation`,
/// `UnknownSource`, `HandlerRequired`) are returned synchronously to the
/// caller. Runtime conditions (`ArityMismatch`, `DeferredUnavailable`) are
/// delivered as a failed outcome through whichever style the caller used.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// An adapter was handed something that is not an operation.
    #[error("function required, got {found}")]
    FunctionRequired {
        /// What was supplied instead.
        found: &'static str,
    },

    /// The operation declares more parameters than the call can satisfy.
    #[error(
        "Expected function with {expected} or fewer arguments which returns a deferred value, \
         or function with {} arguments which takes a completion handler — got function with \
         {declared} arguments.",
        .expected.saturating_add(1)
    )]
    ArityMismatch {
        /// Logical argument count chosen by the caller.
        expected: usize,
        /// Parameter count declared by the operation.
        declared: usize,
    },

    /// An explicitly bound deferred implementation failed validation.
    #[error("invalid deferred implementation: {0}")]
    InvalidDeferredImplementation(String),

    /// No deferred implementation is bound and no ambient default exists.
    #[error(
        "no deferred implementation available: install an ambient default or bind one explicitly"
    )]
    DeferredUnavailable,

    /// The continuation bridge was handed neither a deferred value nor a function.
    #[error("add_callback() expected a deferred value or function, got {kind}")]
    UnknownSource {
        /// What was supplied instead.
        kind: &'static str,
    },

    /// A completion handler was required but none was supplied.
    #[error("completion handler required")]
    HandlerRequired,

    /// A synthesized completion handler was dropped without being invoked.
    #[error("completion handler dropped without being invoked")]
    HandlerDropped,

    /// The operation panicked while running inside a deferred context.
    #[error("operation panicked: {0}")]
    Panicked(String),
}

/// An error value carried by a failed outcome or a rejected deferred value.
///
/// Cheap to clone: the underlying error is shared. Callee errors of any type
/// can be wrapped with [`Fault::new`]; ad-hoc messages with [`Fault::msg`].
#[derive(Clone)]
pub struct Fault(Arc<dyn std::error::Error + Send + Sync + 'static>);

#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

impl Fault {
    /// Wrap any error.
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// A fault carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Build a fault from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        AdapterError::Panicked(message).into()
    }

    /// The fault's display message.
    pub fn message(&self) -> String {
        self.0.to_string()
    }

    /// Borrow the wrapped error as a concrete type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// The wrapped error, if this fault was raised by the adapter.
    pub fn adapter_error(&self) -> Option<&AdapterError> {
        self.downcast_ref::<AdapterError>()
    }

    /// Whether two faults share the same underlying error value.
    pub fn same(&self, other: &Fault) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fault").field(&self.0).finish()
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<AdapterError> for Fault {
    fn from(error: AdapterError) -> Self {
        Self::new(error)
    }
}

impl From<&str> for Fault {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

impl From<String> for Fault {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}
