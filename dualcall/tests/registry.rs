//! Binding to a deferred implementation: explicit, ambient, or none.
//!
//! The ambient default is process-wide, so every step that touches it lives
//! in a single test.

use dualcall::prelude::*;
use dualcall::{install_default, installed_default, Task};
use dualcall_core::test_utils::{CallbackProbe, ManualFactory};
use futures::executor::block_on;
use serde_json::json;
use std::sync::Arc;

struct Broken;

impl DeferredFactory for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn validate(&self) -> Result<(), String> {
        Err("no scheduler".into())
    }

    fn schedule(&self, _task: Task) {}
}

fn add() -> Operation {
    Operation::continuation(2, |_, args, cb| {
        let sum = args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0);
        cb.succeed(json!(sum));
    })
}

fn echo() -> Operation {
    Operation::deferred(1, |_, args| Deferred::resolved(args[0].clone()))
}

fn none() -> Receiver {
    Receiver::none()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Explicit binding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn explicit_binding_is_validated_eagerly() {
    let err = Adapter::bind(Arc::new(Broken)).unwrap_err();
    assert_eq!(
        err,
        AdapterError::InvalidDeferredImplementation("no scheduler".into())
    );

    let config = AdapterConfig::default().with_factory(Arc::new(Broken));
    assert!(Adapter::new(config).is_err());
}

#[test]
fn config_without_factory_is_ambient() {
    let adapter = Adapter::new(AdapterConfig::default()).unwrap();
    assert!(!adapter.is_bound());
}

#[test]
fn instances_are_independent() {
    let first = Arc::new(ManualFactory::new());
    let second = Arc::new(ManualFactory::new());
    let a = Adapter::bind(first.clone()).unwrap();
    let b = Adapter::bind(second.clone()).unwrap();
    assert!(a.is_bound());

    let probe = CallbackProbe::new();
    a.from_deferred(echo())
        .unwrap()
        .call_with(&none(), vec![json!("a")], probe.callback());
    b.from_deferred(echo())
        .unwrap()
        .call_with(&none(), vec![json!("b")], probe.callback());

    assert_eq!(first.pending(), 1);
    assert_eq!(second.pending(), 1);
    second.run_until_idle();
    assert_eq!(probe.single().unwrap().results, vec![json!("b")]);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Ambient default
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn ambient_default_lifecycle() {
    // Nothing installed and no runtime on this thread.
    assert!(installed_default().is_none());
    let adapter = Adapter::ambient();
    assert_eq!(
        adapter.factory().err(),
        Some(AdapterError::DeferredUnavailable)
    );

    // Adapting does not need a deferred implementation.
    let add = adapter.from_continuation(add()).unwrap();
    let echo = adapter.from_deferred(echo()).unwrap();

    // Deferred mode reports the missing implementation as a failure.
    let fault = block_on(add.call(&none(), vec![json!(1), json!(2)])).unwrap_err();
    assert_eq!(
        fault.adapter_error(),
        Some(&AdapterError::DeferredUnavailable)
    );

    // Handler mode of a continuation never needs one.
    let probe = CallbackProbe::new();
    add.call_with(&none(), vec![json!(1), json!(2)], probe.callback());
    assert_eq!(probe.single().unwrap().results, vec![json!(3)]);

    // Delivering to a handler does; the handler gets the failure directly.
    let probe = CallbackProbe::new();
    echo.call_with(&none(), vec![json!("x")], probe.callback());
    let error = probe.single().unwrap().error.unwrap();
    assert!(error.starts_with("no deferred implementation available"));

    // An invalid default is refused and nothing is installed.
    let err = install_default(Arc::new(Broken)).unwrap_err();
    assert!(matches!(err, AdapterError::InvalidDeferredImplementation(_)));
    assert!(installed_default().is_none());

    // Installing one fixes adapters created before it.
    let factory = Arc::new(ManualFactory::new());
    install_default(factory.clone()).unwrap();
    assert_eq!(installed_default().unwrap().name(), "manual");
    assert_eq!(adapter.factory().unwrap().name(), "manual");
    assert_eq!(default_adapter().factory().unwrap().name(), "manual");

    let sum = block_on(add.call(&none(), vec![json!(1), json!(2)])).unwrap();
    assert_eq!(sum, Output::Single(json!(3)));

    let probe = CallbackProbe::new();
    echo.call_with(&none(), vec![json!("x")], probe.callback());
    factory.run_until_idle();
    assert_eq!(probe.single().unwrap().results, vec![json!("x")]);
}
