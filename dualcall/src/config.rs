//! Configuration for an [`Adapter`](crate::Adapter).

use dualcall_core::DeferredFactory;
use std::fmt;
use std::sync::Arc;

/// Static configuration for an adapter instance.
///
/// `factory: None` means "use the ambient default", resolved lazily the
/// first time a deferred value is needed.
#[derive(Clone, Default)]
pub struct AdapterConfig {
    /// The deferred implementation to bind, or `None` for the ambient default.
    pub factory: Option<Arc<dyn DeferredFactory>>,
}

impl AdapterConfig {
    /// Bind an explicit deferred implementation.
    pub fn with_factory(mut self, factory: Arc<dyn DeferredFactory>) -> Self {
        self.factory = Some(factory);
        self
    }
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("factory", &self.factory.as_ref().map(|factory| factory.name()))
            .finish()
    }
}
