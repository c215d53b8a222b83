//! Channel-backed observer for blocking state iteration.
//!
//! Lets callers consume adapter state changes with an iterator instead of
//! implementing [`AdapterStateObserver`] themselves: register the watcher
//! half with a broker and read states off the iterator half.

use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use crate::observer::AdapterStateObserver;
use crate::state::AdapterState;

/// Create a connected watcher/iterator pair.
///
/// Every state delivered to the watcher appears in the iterator, including
/// the catch-up notification sent at registration time.
pub fn channel() -> (Arc<StateWatcher>, StateIterator) {
    let (tx, rx) = mpsc::channel();

    let watcher = Arc::new(StateWatcher { tx: Mutex::new(tx) });
    let iterator = StateIterator {
        rx: Arc::new(Mutex::new(rx)),
    };

    (watcher, iterator)
}

/// Observer that enqueues every delivered state.
pub struct StateWatcher {
    tx: Mutex<mpsc::Sender<AdapterState>>,
}

impl AdapterStateObserver for StateWatcher {
    fn on_state_changed(&self, state: AdapterState) {
        // A dropped iterator just discards further states.
        if let Ok(tx) = self.tx.lock() {
            let _ = tx.send(state);
        }
    }
}

/// Blocking iterator over delivered adapter states.
///
/// Blocks on `next()` until a state is available. Use `try_recv()` for
/// non-blocking access.
pub struct StateIterator {
    rx: Arc<Mutex<mpsc::Receiver<AdapterState>>>,
}

impl StateIterator {
    /// Block until a state is available.
    ///
    /// Returns `None` once the watcher has been dropped.
    pub fn recv(&self) -> Option<AdapterState> {
        self.rx.lock().ok()?.recv().ok()
    }

    /// Try to receive a state without blocking.
    ///
    /// Returns `None` if no state is currently queued.
    pub fn try_recv(&self) -> Option<AdapterState> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Block until a state is available or the timeout expires.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AdapterState> {
        self.rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    /// Non-blocking iterator over currently queued states.
    ///
    /// Useful for draining a backlog without blocking.
    pub fn try_iter(&self) -> TryIterator<'_> {
        TryIterator { inner: self }
    }

    /// Blocking iterator that waits up to `timeout` on each `next()`.
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIterator<'_> {
        TimeoutIterator {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for StateIterator {
    type Item = AdapterState;

    /// Block until the next state is available.
    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl Clone for StateIterator {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

/// Non-blocking iterator over currently queued states.
pub struct TryIterator<'a> {
    inner: &'a StateIterator,
}

impl<'a> Iterator for TryIterator<'a> {
    type Item = AdapterState;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with a per-item timeout.
pub struct TimeoutIterator<'a> {
    inner: &'a StateIterator,
    timeout: Duration,
}

impl<'a> Iterator for TimeoutIterator<'a> {
    type Item = AdapterState;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
