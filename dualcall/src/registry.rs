//! The ambient default deferred implementation and how adapters bind to it.
//!
//! The ambient default is process-wide configuration. Install it once at
//! startup with [`install_default`]; it is not meant to be swapped while
//! adapters are in use. Adapters created with [`Adapter::ambient`](crate::Adapter::ambient)
//! resolve it lazily, on the first call that needs a deferred value, because
//! the hosting environment may install it (or start a runtime) after the
//! adapter was created.
//!
//! Resolution order:
//! 1. the factory passed to [`install_default`]
//! 2. a `TokioFactory` for the current runtime (feature `tokio`)
//! 3. otherwise [`AdapterError::DeferredUnavailable`]

use dualcall_core::{AdapterError, DeferredFactory};
use std::sync::{Arc, OnceLock, RwLock};

static AMBIENT: RwLock<Option<Arc<dyn DeferredFactory>>> = RwLock::new(None);

/// Install the process-wide default deferred implementation.
///
/// Validated eagerly; an invalid factory is rejected and the previous
/// default (if any) is kept.
pub fn install_default(factory: Arc<dyn DeferredFactory>) -> Result<(), AdapterError> {
    factory
        .validate()
        .map_err(AdapterError::InvalidDeferredImplementation)?;
    tracing::info!(factory = factory.name(), "dualcall.registry.install_default");
    *AMBIENT.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(factory);
    Ok(())
}

/// The installed default, if any.
pub fn installed_default() -> Option<Arc<dyn DeferredFactory>> {
    AMBIENT
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Resolve the ambient default now, validating it.
pub fn resolve_default() -> Result<Arc<dyn DeferredFactory>, AdapterError> {
    if let Some(factory) = installed_default() {
        factory
            .validate()
            .map_err(AdapterError::InvalidDeferredImplementation)?;
        return Ok(factory);
    }

    runtime_fallback().ok_or(AdapterError::DeferredUnavailable)
}

#[cfg(feature = "tokio")]
fn runtime_fallback() -> Option<Arc<dyn DeferredFactory>> {
    if dualcall_tokio::TokioFactory::runtime_available() {
        Some(Arc::new(dualcall_tokio::TokioFactory::current_runtime()))
    } else {
        None
    }
}

#[cfg(not(feature = "tokio"))]
fn runtime_fallback() -> Option<Arc<dyn DeferredFactory>> {
    None
}

/// How an adapter finds its deferred implementation.
#[derive(Clone)]
pub(crate) enum Binding {
    /// Bound and validated at construction.
    Explicit(Arc<dyn DeferredFactory>),
    /// Resolved from the ambient default on first need, then cached. A
    /// failed resolution is not cached.
    Ambient(Arc<OnceLock<Arc<dyn DeferredFactory>>>),
}

impl Binding {
    pub(crate) fn ambient() -> Self {
        Self::Ambient(Arc::new(OnceLock::new()))
    }

    pub(crate) fn resolve(&self) -> Result<Arc<dyn DeferredFactory>, AdapterError> {
        match self {
            Self::Explicit(factory) => Ok(factory.clone()),
            Self::Ambient(cell) => {
                if let Some(factory) = cell.get() {
                    return Ok(factory.clone());
                }
                let resolved = resolve_default().inspect_err(|err| {
                    tracing::debug!(error = %err, "dualcall.registry.unresolved");
                })?;
                let factory = cell.get_or_init(|| resolved);
                tracing::debug!(factory = factory.name(), "dualcall.registry.resolved");
                Ok(factory.clone())
            }
        }
    }

    pub(crate) fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }
}
