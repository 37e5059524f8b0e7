//! ManualFactory — a deferred factory whose turns are driven by the test.

use crate::deferred::{DeferredFactory, Task};
use futures::task::noop_waker_ref;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::task::{Context, Poll};

/// A [`DeferredFactory`] that queues scheduled tasks instead of running them.
///
/// Nothing scheduled runs until [`run_until_idle`](Self::run_until_idle) is
/// called, so a test can observe state between "settled" and "handler ran".
/// A panic inside a task unwinds out of `run_until_idle`, the same way an
/// unhandled fault escapes to the top level of an event loop.
pub struct ManualFactory {
    queue: Mutex<VecDeque<Task>>,
    scheduled: AtomicUsize,
}

impl ManualFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            scheduled: AtomicUsize::new(0),
        }
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Total number of tasks ever scheduled.
    pub fn scheduled(&self) -> usize {
        self.scheduled.load(Ordering::SeqCst)
    }

    /// Poll queued tasks until every one has finished or none can make
    /// progress. Returns the number of tasks that finished.
    pub fn run_until_idle(&self) -> usize {
        let mut cx = Context::from_waker(noop_waker_ref());
        let mut finished = 0;
        let mut stalled = 0;
        loop {
            let next = self.queue.lock().unwrap().pop_front();
            let Some(mut task) = next else { break };
            match task.as_mut().poll(&mut cx) {
                Poll::Ready(()) => {
                    finished += 1;
                    stalled = 0;
                }
                Poll::Pending => {
                    let mut queue = self.queue.lock().unwrap();
                    queue.push_back(task);
                    stalled += 1;
                    if stalled > queue.len() {
                        break;
                    }
                }
            }
        }
        finished
    }
}

impl Default for ManualFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredFactory for ManualFactory {
    fn name(&self) -> &str {
        "manual"
    }

    fn schedule(&self, task: Task) {
        self.scheduled.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().unwrap().push_back(task);
    }
}
