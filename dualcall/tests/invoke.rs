//! The uniform invoker.

use dualcall::prelude::*;
use dualcall_core::test_utils::{CallbackProbe, ManualFactory};
use futures::executor::block_on;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn manual() -> (Arc<ManualFactory>, Adapter) {
    let factory = Arc::new(ManualFactory::new());
    let adapter = Adapter::bind(factory.clone()).unwrap();
    (factory, adapter)
}

fn none() -> Receiver {
    Receiver::none()
}

fn add_continuation() -> Operation {
    Operation::continuation(2, |_, args, cb| {
        let sum = args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0);
        cb.succeed(json!(sum));
    })
}

fn add_deferred() -> Operation {
    Operation::deferred(2, |_, args| {
        let sum = args[0].as_i64().unwrap_or(0) + args[1].as_i64().unwrap_or(0);
        Deferred::resolved(json!(sum))
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Style inference
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn continuation_style_is_detected() {
    let (_, adapter) = manual();
    let deferred = adapter
        .apply_fn(&add_continuation(), 2, &none(), vec![json!(3), json!(5)], None)
        .unwrap();
    assert_eq!(block_on(deferred).unwrap(), Output::Single(json!(8)));
}

#[test]
fn deferred_style_is_detected() {
    let (_, adapter) = manual();
    let deferred = adapter
        .apply_fn(&add_deferred(), 2, &none(), vec![json!(3), json!(5)], None)
        .unwrap();
    assert_eq!(block_on(deferred).unwrap(), Output::Single(json!(8)));
}

#[test]
fn fewer_declared_parameters_is_deferred_style() {
    let (_, adapter) = manual();
    let constant = Operation::sync(0, |_, _| Ok(json!("constant")));
    let deferred = adapter.call(&constant, &none(), vec![json!(1), json!(2)]);
    assert_eq!(block_on(deferred).unwrap(), Output::Single(json!("constant")));
}

#[test]
fn too_many_declared_parameters_is_a_mismatch() {
    let (_, adapter) = manual();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let wide = Operation::new(5, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Returned::Absent)
    });

    let deferred = adapter
        .apply_fn(&wide, 3, &none(), vec![json!(1), json!(2), json!(3)], None)
        .unwrap();
    let fault = block_on(deferred).unwrap_err();

    assert_eq!(
        fault.adapter_error(),
        Some(&AdapterError::ArityMismatch {
            expected: 3,
            declared: 5
        })
    );
    assert_eq!(
        fault.message(),
        "Expected function with 3 or fewer arguments which returns a deferred value, \
         or function with 4 arguments which takes a completion handler — got function with \
         5 arguments."
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn largest_count_is_deferred_style_without_overflow() {
    let (_, adapter) = manual();
    let deferred = adapter
        .apply_fn(&add_deferred(), usize::MAX, &none(), vec![json!(1), json!(2)], None)
        .unwrap();
    assert_eq!(block_on(deferred).unwrap(), Output::Single(json!(3)));

    let deferred = adapter
        .call_fn(&add_deferred(), usize::MAX, &none(), vec![json!(2), json!(2)], None)
        .unwrap();
    assert_eq!(block_on(deferred).unwrap(), Output::Single(json!(4)));
}

#[test]
fn mismatch_is_delivered_to_the_handler() {
    let (factory, adapter) = manual();
    let wide = Operation::new(4, |_| Ok(Returned::Absent));
    let probe = CallbackProbe::new();

    adapter.apply_fn(&wide, 1, &none(), vec![json!(1)], Some(probe.callback()));
    factory.run_until_idle();

    let error = probe.single().unwrap().error.unwrap();
    assert!(error.starts_with("Expected function with 1 or fewer arguments"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Arguments
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn recording(arity: usize, seen: Arc<Mutex<Vec<Value>>>) -> Operation {
    Operation::deferred(arity, move |_, args| {
        *seen.lock().unwrap() = args;
        Deferred::resolved(())
    })
}

#[test]
fn short_argument_lists_are_padded() {
    let (_, adapter) = manual();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let op = recording(3, seen.clone());

    let deferred = adapter.apply_fn(&op, 3, &none(), vec![json!(1)], None).unwrap();
    block_on(deferred).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![json!(1), Value::Null, Value::Null]);
}

#[test]
fn padding_reaches_a_continuation() {
    let (_, adapter) = manual();
    let deferred = adapter
        .apply_fn(&add_continuation(), 2, &none(), vec![json!(4)], None)
        .unwrap();
    assert_eq!(block_on(deferred).unwrap(), Output::Single(json!(4)));
}

#[test]
fn call_fn_takes_only_the_first_count_arguments() {
    let (_, adapter) = manual();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let op = recording(1, seen.clone());

    let deferred = adapter
        .call_fn(&op, 1, &none(), vec![json!("kept"), json!("dropped")], None)
        .unwrap();
    block_on(deferred).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![json!("kept")]);
}

#[test]
fn apply_counts_the_supplied_arguments() {
    let (_, adapter) = manual();
    // Two arguments: a three-parameter operation is a continuation.
    let deferred = adapter
        .apply(&add_continuation(), &none(), vec![json!(2), json!(2)], None)
        .unwrap();
    assert_eq!(block_on(deferred).unwrap(), Output::Single(json!(4)));
}

#[test]
fn receiver_is_forwarded() {
    let (_, adapter) = manual();
    let seen: Arc<Mutex<Option<Receiver>>> = Arc::new(Mutex::new(None));
    let log = seen.clone();
    let op = Operation::continuation(0, move |receiver, _, cb| {
        *log.lock().unwrap() = Some(receiver.clone());
        cb.succeed_with(vec![]);
    });
    let receiver = Receiver::new(7_u64);

    block_on(adapter.call(&op, &receiver, vec![])).unwrap();

    assert!(seen.lock().unwrap().as_ref().unwrap().same(&receiver));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Result packing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn pair() -> Operation {
    Operation::continuation(1, |_, args, cb| {
        cb.succeed_with(vec![args[0].clone(), json!(2)]);
    })
}

#[test]
fn multiple_results_resolve_as_a_sequence() {
    let (_, adapter) = manual();
    let deferred = adapter.apply_fn(&pair(), 1, &none(), vec![json!(1)], None).unwrap();
    assert_eq!(
        block_on(deferred).unwrap(),
        Output::Sequence(vec![json!(1), json!(2)])
    );
}

#[test]
fn multiple_results_reach_the_handler_separately() {
    let (factory, adapter) = manual();
    let probe = CallbackProbe::new();

    adapter.apply_fn(&pair(), 1, &none(), vec![json!(1)], Some(probe.callback()));
    factory.run_until_idle();

    let report = probe.single().unwrap();
    assert_eq!(report.error, None);
    assert_eq!(report.results, vec![json!(1), json!(2)]);
}

#[test]
fn no_results_resolve_as_absent() {
    let (_, adapter) = manual();
    let silent = Operation::continuation(0, |_, _, cb| {
        cb.succeed_with(vec![]);
    });
    let deferred = adapter.apply_fn(&silent, 0, &none(), vec![], None).unwrap();
    assert_eq!(block_on(deferred).unwrap(), Output::Absent);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Failures are captured
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn synchronous_error_is_captured() {
    let (_, adapter) = manual();
    let refusing = Operation::new(1, |_| Err(Fault::msg("refused")));
    let fault = block_on(adapter.call(&refusing, &none(), vec![json!(1)])).unwrap_err();
    assert_eq!(fault.message(), "refused");

    // Same operation treated as a continuation (count 0).
    let fault = block_on(adapter.call(&refusing, &none(), vec![])).unwrap_err();
    assert_eq!(fault.message(), "refused");
}

fn explode(_: Invocation) -> Result<Returned, Fault> {
    panic!("invoked and exploded")
}

#[test]
fn panics_are_captured_in_either_style() {
    let (_, adapter) = manual();
    let op = Operation::new(1, explode);

    let as_deferred = block_on(adapter.call(&op, &none(), vec![json!(1)])).unwrap_err();
    assert_eq!(as_deferred.message(), "operation panicked: invoked and exploded");

    let as_continuation = block_on(adapter.call(&op, &none(), vec![])).unwrap_err();
    assert_eq!(
        as_continuation.message(),
        "operation panicked: invoked and exploded"
    );
}

#[test]
fn continuation_return_value_is_ignored() {
    let (_, adapter) = manual();
    let both = Operation::new(1, |inv| {
        if let Some(cb) = inv.callback {
            cb.succeed(json!("from handler"));
        }
        Ok(Returned::Value(json!("from return")))
    });

    let deferred = adapter.apply_fn(&both, 0, &none(), vec![], None).unwrap();
    assert_eq!(block_on(deferred).unwrap(), Output::Single(json!("from handler")));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Handler delivery
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn handler_is_called_on_a_later_turn() {
    let (factory, adapter) = manual();
    let probe = CallbackProbe::new();

    let returned = adapter.apply_fn(
        &add_continuation(),
        2,
        &none(),
        vec![json!(3), json!(5)],
        Some(probe.callback()),
    );

    assert!(returned.is_none());
    assert!(probe.reports().is_empty());
    factory.run_until_idle();
    assert_eq!(probe.single().unwrap().results, vec![json!(8)]);
}

#[test]
fn call_with_callback_delivers() {
    let (factory, adapter) = manual();
    let probe = CallbackProbe::new();

    adapter
        .call_with_callback(&add_deferred(), &none(), vec![json!(1), json!(1)], Some(probe.callback()))
        .unwrap();
    factory.run_until_idle();

    assert_eq!(probe.single().unwrap().results, vec![json!(2)]);
}

#[test]
fn call_with_callback_requires_a_handler() {
    let (factory, adapter) = manual();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let op = Operation::sync(0, move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Null)
    });

    let err = adapter
        .call_with_callback(&op, &none(), vec![], None)
        .unwrap_err();

    assert_eq!(err, AdapterError::HandlerRequired);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(factory.scheduled(), 0);
}
