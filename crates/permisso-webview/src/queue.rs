//! Serial worker that runs integrator callbacks off the UI thread.
//!
//! Each renderer owns one queue. Jobs run one at a time in submission order,
//! so message deliveries and custom link callbacks from a single renderer
//! never overtake each other. A panicking job is logged and the worker keeps
//! serving the jobs behind it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use tracing::{debug, error, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Task {
    Run(Job),
    Barrier(mpsc::Sender<()>),
}

#[derive(Clone)]
pub struct HandlerQueue {
    tx: mpsc::Sender<Task>,
    name: Arc<str>,
    worker: Option<ThreadId>,
}

impl HandlerQueue {
    /// Start a named worker thread.
    ///
    /// If the OS refuses the thread the queue is created disconnected: every
    /// `submit` returns `false` and nothing runs.
    pub fn spawn(name: impl Into<String>) -> Self {
        let name: Arc<str> = Arc::from(name.into());
        let (tx, rx) = mpsc::channel::<Task>();

        let worker_name = Arc::clone(&name);
        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(&worker_name, rx));

        let worker = match spawned {
            Ok(handle) => Some(handle.thread().id()),
            Err(e) => {
                error!(queue = %name, error = %e, "failed to start handler worker");
                None
            }
        };

        Self { tx, name, worker }
    }

    /// Whether the caller is this queue's worker thread.
    pub fn is_worker_thread(&self) -> bool {
        self.worker == Some(thread::current().id())
    }

    /// Queue a job. Returns `false` if the worker is gone.
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Task::Run(Box::new(job))).is_err() {
            warn!(queue = %self.name, "handler worker unavailable; job dropped");
            return false;
        }
        true
    }

    /// Block until every job submitted before this call has finished.
    ///
    /// Returns immediately when called from the worker itself.
    pub fn flush(&self) {
        if self.is_worker_thread() {
            return;
        }
        let (done_tx, done_rx) = mpsc::channel();
        if self.tx.send(Task::Barrier(done_tx)).is_ok() {
            let _ = done_rx.recv();
        }
    }
}

fn worker_loop(name: &str, rx: mpsc::Receiver<Task>) {
    while let Ok(task) = rx.recv() {
        match task {
            Task::Run(job) => {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                    error!(
                        queue = %name,
                        reason = %panic_message(payload.as_ref()),
                        "integrator callback panicked"
                    );
                }
            }
            Task::Barrier(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(queue = %name, "handler worker stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
