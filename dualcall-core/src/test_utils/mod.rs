//! In-memory helpers for testing.
//!
//! Available behind the `test-utils` feature flag. `ManualFactory` runs
//! scheduled turns only when asked, which makes turn ordering observable.

mod manual_factory;
mod probe;

pub use manual_factory::ManualFactory;
pub use probe::{CallbackProbe, Report};
