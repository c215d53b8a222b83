//! Execution contexts for observer notification dispatch.
//!
//! Each registration names the context its notifications run on; different
//! observers may use different targets. The broker hands a notification off
//! and moves on: a rejected job is dropped without retry.

use std::sync::{mpsc, Mutex};
use std::thread::{self, JoinHandle};

use tokio::runtime::Handle;

use crate::error::DispatchError;

/// A queued notification closure.
pub type Job = Box<dyn FnOnce() + Send>;

/// Scheduling target on which an observer's notifications run.
pub trait Executor: Send + Sync {
    /// Hand a job to this execution context.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if the context cannot accept the job. The
    /// broker logs and drops the notification in that case.
    fn execute(&self, job: Job) -> Result<(), DispatchError>;
}

/// Runs jobs synchronously on the calling thread.
///
/// Useful in tests and for cheap observers. An observer dispatched inline
/// runs on whichever thread triggered the notification, so it must not block
/// on work the dispatching thread is responsible for.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) -> Result<(), DispatchError> {
        job();
        Ok(())
    }
}

/// Dedicated worker thread draining a FIFO job queue.
///
/// Jobs run in submission order, so an observer bound to one
/// `ThreadExecutor` sees its notifications in the order they were handed
/// off. Dropping the executor closes the queue; the worker finishes jobs
/// already submitted and exits.
pub struct ThreadExecutor {
    tx: Mutex<mpsc::Sender<Job>>,
    _worker: JoinHandle<()>,
}

impl ThreadExecutor {
    /// Spawn a new worker thread.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Job>();

        let worker = thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                job();
            }
            tracing::debug!("Dispatch worker queue closed, exiting");
        });

        Self {
            tx: Mutex::new(tx),
            _worker: worker,
        }
    }
}

impl Default for ThreadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) -> Result<(), DispatchError> {
        let tx = self.tx.lock().map_err(|_| DispatchError::Terminated)?;
        tx.send(job).map_err(|_| DispatchError::Terminated)
    }
}

/// Hands jobs to a tokio runtime.
///
/// The handle must belong to a runtime that is still alive when jobs are
/// submitted; `tokio` panics on spawn after the runtime has shut down.
#[derive(Clone)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    /// Dispatch onto the runtime behind the given handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Dispatch onto the runtime of the calling context.
    ///
    /// Panics when called outside a tokio runtime; prefer
    /// [`TokioExecutor::new`] when a handle is available.
    pub fn current() -> Self {
        Self {
            handle: Handle::current(),
        }
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, job: Job) -> Result<(), DispatchError> {
        self.handle.spawn(async move { job() });
        Ok(())
    }
}
