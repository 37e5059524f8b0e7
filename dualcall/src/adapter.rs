//! The adapter instance: one deferred implementation binding plus every
//! adapter, bridge and invoker built on it.

use crate::config::AdapterConfig;
use crate::registry::Binding;
use dualcall_core::{AdapterError, DeferredFactory};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// An adapter instance.
///
/// Immutable after construction and holds no per-call state, so it can be
/// cloned freely and shared across threads. Instances are independent of
/// each other; clones of an ambient instance share its resolved binding.
///
/// The conversion methods live in the modules that implement them:
/// - [`from_continuation`](Adapter::from_continuation) ("make")
/// - [`from_deferred`](Adapter::from_deferred) ("break")
/// - [`add_deferred`](Adapter::add_deferred) and [`add_callback`](Adapter::add_callback)
/// - [`apply_fn`](Adapter::apply_fn) and its convenience variants
#[derive(Clone)]
pub struct Adapter {
    binding: Binding,
}

impl Adapter {
    /// Build an adapter from configuration.
    pub fn new(config: AdapterConfig) -> Result<Self, AdapterError> {
        match config.factory {
            Some(factory) => Self::bind(factory),
            None => Ok(Self::ambient()),
        }
    }

    /// Bind an explicit deferred implementation, validating it now.
    pub fn bind(factory: Arc<dyn DeferredFactory>) -> Result<Self, AdapterError> {
        factory
            .validate()
            .map_err(AdapterError::InvalidDeferredImplementation)?;
        Ok(Self {
            binding: Binding::Explicit(factory),
        })
    }

    /// An adapter that uses the ambient default, validated on first use.
    pub fn ambient() -> Self {
        Self {
            binding: Binding::ambient(),
        }
    }

    /// The deferred implementation this adapter uses, resolving the ambient
    /// default if necessary.
    pub fn factory(&self) -> Result<Arc<dyn DeferredFactory>, AdapterError> {
        self.binding.resolve()
    }

    /// Whether an explicit implementation was bound.
    pub fn is_bound(&self) -> bool {
        self.binding.is_explicit()
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::ambient()
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            Binding::Explicit(factory) => f
                .debug_struct("Adapter")
                .field("factory", &factory.name())
                .finish(),
            Binding::Ambient(cell) => f
                .debug_struct("Adapter")
                .field("ambient", &cell.get().map(|factory| factory.name()))
                .finish(),
        }
    }
}

/// The process-wide adapter that uses the ambient default.
pub fn default_adapter() -> &'static Adapter {
    static DEFAULT: OnceLock<Adapter> = OnceLock::new();
    DEFAULT.get_or_init(Adapter::ambient)
}
