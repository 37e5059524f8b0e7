//! Values that flow through an invocation: positional data, the receiver,
//! and the normalized success payload.

use crate::error::Fault;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use serde_json::Value;

/// The normalized result of one invocation.
pub type Outcome = Result<Output, Fault>;

/// The success payload of an [`Outcome`].
///
/// A continuation reports zero, one or several results after its error slot.
/// Exactly one representation is used for each case; a single result is never
/// wrapped in a sequence and several results are never collapsed into one.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Output {
    /// No result was reported.
    #[default]
    Absent,
    /// Exactly one result.
    Single(Value),
    /// Two or more results, in the order they were reported.
    Sequence(Vec<Value>),
}

impl Output {
    /// Apply the packing rule to the results reported after the error slot.
    pub fn pack(mut results: Vec<Value>) -> Self {
        match results.len() {
            0 => Self::Absent,
            1 => Self::Single(results.remove(0)),
            _ => Self::Sequence(results),
        }
    }

    /// The results as a completion handler would receive them.
    pub fn unpack(self) -> Vec<Value> {
        match self {
            Self::Absent => Vec::new(),
            Self::Single(value) => vec![value],
            Self::Sequence(values) => values,
        }
    }

    /// Flatten into one JSON value: absent becomes null, a sequence an array.
    pub fn into_value(self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Single(value) => value,
            Self::Sequence(values) => Value::Array(values),
        }
    }

    /// Whether no result was reported.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Decode the flattened payload into a typed value.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.into_value())
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<Value>> for Output {
    fn from(values: Vec<Value>) -> Self {
        Self::pack(values)
    }
}

impl From<()> for Output {
    fn from(_: ()) -> Self {
        Self::Absent
    }
}

/// The ambient receiver an operation may read at call time.
///
/// Adapters forward the receiver they were given by clone, so the operation
/// observes the very object the call site passed. An empty receiver is the
/// equivalent of calling with no receiver bound.
#[derive(Clone, Default)]
pub struct Receiver(Option<Arc<dyn Any + Send + Sync>>);

impl Receiver {
    /// No receiver.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a value as the receiver.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Use an already shared value as the receiver.
    pub fn from_arc(value: Arc<dyn Any + Send + Sync>) -> Self {
        Self(Some(value))
    }

    /// Whether no receiver is bound.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the receiver as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|value| value.downcast_ref::<T>())
    }

    /// Whether both receivers are the same object (or both empty).
    pub fn same(&self, other: &Receiver) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "Receiver({:p})", Arc::as_ptr(value)),
            None => f.write_str("Receiver(none)"),
        }
    }
}

/// A short name for the JSON type of a value, used in error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
