//! Operations: invocable values with a declared parameter count.

use crate::callback::Callback;
use crate::deferred::Deferred;
use crate::error::{AdapterError, Fault};
use crate::value::{kind_of, Output, Receiver, Value};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

static ABSENT: Value = Value::Null;

/// Everything an operation receives at call time.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// The ambient receiver supplied at the call site.
    pub receiver: Receiver,
    /// Positional arguments, excluding the trailing handler slot.
    pub args: Vec<Value>,
    /// The trailing completion handler, if one was passed.
    pub callback: Option<Callback>,
}

impl Invocation {
    /// An invocation with positional arguments and no handler.
    pub fn new(receiver: Receiver, args: Vec<Value>) -> Self {
        Self {
            receiver,
            args,
            callback: None,
        }
    }

    /// Attach a trailing handler.
    pub fn with_callback(mut self, callback: Callback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// The positional argument at `index`, or null past the end.
    pub fn arg(&self, index: usize) -> &Value {
        self.args.get(index).unwrap_or(&ABSENT)
    }
}

/// What an operation hands back synchronously.
#[derive(Debug, Default)]
pub enum Returned {
    /// Nothing useful (continuation-style operations usually return this).
    #[default]
    Absent,
    /// A plain value.
    Value(Value),
    /// A deferred value.
    Deferred(Deferred),
}

impl Returned {
    /// Treat the return value as a deferred value: plain values resolve
    /// immediately, deferred values pass through.
    pub fn into_deferred(self) -> Deferred {
        match self {
            Self::Absent => Deferred::resolved(Output::Absent),
            Self::Value(value) => Deferred::resolved(value),
            Self::Deferred(deferred) => deferred,
        }
    }

    /// Whether nothing was returned.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<Value> for Returned {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Deferred> for Returned {
    fn from(deferred: Deferred) -> Self {
        Self::Deferred(deferred)
    }
}

impl From<()> for Returned {
    fn from(_: ()) -> Self {
        Self::Absent
    }
}

type Body = dyn Fn(Invocation) -> Result<Returned, Fault> + Send + Sync;

/// An invocable value with a declared positional parameter count.
///
/// The declared arity counts every parameter, including a trailing handler
/// slot. Returning `Err` is the equivalent of throwing synchronously.
#[derive(Clone)]
pub struct Operation {
    name: Option<Arc<str>>,
    arity: usize,
    body: Arc<Body>,
}

impl Operation {
    /// An operation from a raw body.
    pub fn new<F>(arity: usize, body: F) -> Self
    where
        F: Fn(Invocation) -> Result<Returned, Fault> + Send + Sync + 'static,
    {
        Self {
            name: None,
            arity,
            body: Arc::new(body),
        }
    }

    /// A continuation-style operation taking `params` positional arguments
    /// followed by a completion handler. Declared arity is `params + 1`.
    ///
    /// Invoked without a handler, it fails with
    /// [`AdapterError::HandlerRequired`].
    pub fn continuation<F>(params: usize, f: F) -> Self
    where
        F: Fn(&Receiver, Vec<Value>, Callback) + Send + Sync + 'static,
    {
        Self::new(params + 1, move |inv: Invocation| {
            let callback = inv.callback.ok_or(AdapterError::HandlerRequired)?;
            f(&inv.receiver, inv.args, callback);
            Ok(Returned::Absent)
        })
    }

    /// A deferred-style operation taking `params` positional arguments and
    /// returning a deferred value.
    pub fn deferred<F>(params: usize, f: F) -> Self
    where
        F: Fn(&Receiver, Vec<Value>) -> Deferred + Send + Sync + 'static,
    {
        Self::new(params, move |inv: Invocation| {
            Ok(Returned::Deferred(f(&inv.receiver, inv.args)))
        })
    }

    /// An operation that returns a plain value synchronously.
    pub fn sync<F>(params: usize, f: F) -> Self
    where
        F: Fn(&Receiver, Vec<Value>) -> Result<Value, Fault> + Send + Sync + 'static,
    {
        Self::new(params, move |inv: Invocation| {
            f(&inv.receiver, inv.args).map(Returned::Value)
        })
    }

    /// A zero-argument operation.
    pub fn thunk<F>(f: F) -> Self
    where
        F: Fn() -> Result<Returned, Fault> + Send + Sync + 'static,
    {
        Self::new(0, move |_| f())
    }

    /// Attach a name, used in logs.
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The operation's name, if one was attached.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared positional parameter count.
    pub fn declared_arity(&self) -> usize {
        self.arity
    }

    /// Invoke the operation. Panics propagate to the caller.
    pub fn invoke(&self, invocation: Invocation) -> Result<Returned, Fault> {
        (self.body)(invocation)
    }

    /// Invoke the operation, turning a panic into a fault.
    pub fn invoke_caught(&self, invocation: Invocation) -> Result<Returned, Fault> {
        std::panic::catch_unwind(AssertUnwindSafe(|| self.invoke(invocation)))
            .unwrap_or_else(|payload| Err(Fault::from_panic(payload)))
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A dynamically-typed value handed to an adapter: an operation, a deferred
/// value, or plain data.
#[derive(Debug)]
pub enum Operand {
    /// Something invocable.
    Operation(Operation),
    /// A deferred value.
    Deferred(Deferred),
    /// Plain data.
    Value(Value),
}

impl Operand {
    /// A short name for what this operand holds.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Operation(_) => "function",
            Self::Deferred(_) => "deferred value",
            Self::Value(value) => kind_of(value),
        }
    }

    /// The operation, or [`AdapterError::FunctionRequired`].
    pub fn into_operation(self) -> Result<Operation, AdapterError> {
        match self {
            Self::Operation(op) => Ok(op),
            other => Err(AdapterError::FunctionRequired {
                found: other.kind(),
            }),
        }
    }
}

impl From<Operation> for Operand {
    fn from(op: Operation) -> Self {
        Self::Operation(op)
    }
}

impl From<&Operation> for Operand {
    fn from(op: &Operation) -> Self {
        Self::Operation(op.clone())
    }
}

impl From<Deferred> for Operand {
    fn from(deferred: Deferred) -> Self {
        Self::Deferred(deferred)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}
