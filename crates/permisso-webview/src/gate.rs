//! Liveness gate in front of a renderer's handler queue.
//!
//! Message deliveries and custom link callbacks are both submitted through
//! a [`CallbackGate`]. Each job checks the gate on the worker right before
//! it calls into integrator code, so closing the gate cancels everything
//! still queued. Checking whether the gate is open never blocks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::queue::HandlerQueue;

#[derive(Clone)]
pub struct CallbackGate {
    queue: HandlerQueue,
    open: Arc<AtomicBool>,
    /// Held shared while a callback runs, exclusively by `close`.
    running: Arc<RwLock<()>>,
}

impl CallbackGate {
    pub fn new(queue: HandlerQueue) -> Self {
        Self {
            queue,
            open: Arc::new(AtomicBool::new(true)),
            running: Arc::new(RwLock::new(())),
        }
    }

    pub fn queue(&self) -> &HandlerQueue {
        &self.queue
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Queue `job` to run on the worker if the gate is still open by then.
    /// Returns `false` if the gate is already closed or the worker is gone.
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.is_open() {
            return false;
        }
        let gate = self.clone();
        self.queue.submit(move || {
            if !gate.run(job) {
                trace!("gate closed before callback ran; skipped");
            }
        })
    }

    /// Run `f` now unless the gate is closed. Returns whether it ran.
    pub fn run<F: FnOnce()>(&self, f: F) -> bool {
        let _running = self.running.read().unwrap_or_else(PoisonError::into_inner);
        if !self.is_open() {
            return false;
        }
        f();
        true
    }

    /// Close the gate. Returns `true` if this call closed it.
    ///
    /// Once this returns no callback can start. A callback already running
    /// on another thread is waited for; called from inside a callback on
    /// the worker, it returns without waiting.
    pub fn close(&self) -> bool {
        let was_open = self.open.swap(false, Ordering::AcqRel);
        if !self.queue.is_worker_thread() {
            drop(self.running.write().unwrap_or_else(PoisonError::into_inner));
        }
        was_open
    }

    /// Block until every job submitted so far has run or been skipped.
    pub fn flush(&self) {
        self.queue.flush();
    }
}
