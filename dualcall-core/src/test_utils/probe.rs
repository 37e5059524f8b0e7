//! CallbackProbe — a completion handler that records what it was given.

use crate::callback::Callback;
use crate::value::{Output, Value};
use std::sync::{Arc, Mutex};

/// One recorded handler invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Message of the fault in the error slot, if any.
    pub error: Option<String>,
    /// The results after the error slot.
    pub results: Vec<Value>,
}

impl Report {
    /// The results packed the way a deferred value would resolve.
    pub fn output(&self) -> Output {
        Output::pack(self.results.clone())
    }
}

/// Hands out recording callbacks and exposes what they saw.
#[derive(Clone, Default)]
pub struct CallbackProbe {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl CallbackProbe {
    /// Create an empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh callback that records into this probe.
    pub fn callback(&self) -> Callback {
        let reports = self.reports.clone();
        Callback::new(move |error, results| {
            reports.lock().unwrap().push(Report {
                error: error.map(|fault| fault.message()),
                results,
            });
        })
    }

    /// A snapshot of every report so far.
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }

    /// The only report, if exactly one was recorded.
    pub fn single(&self) -> Option<Report> {
        let reports = self.reports.lock().unwrap();
        match reports.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        }
    }
}
