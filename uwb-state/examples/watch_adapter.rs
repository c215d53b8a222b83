//! Watch adapter state changes with a blocking iterator.
//!
//! Uses an in-process demo service so the example runs without adapter
//! hardware; swap in your platform's IPC-backed `AdapterService` for real
//! use.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use uwb_state::logging::{init_logging, LoggingMode};
use uwb_state::{
    raw, watch, AdapterService, AdapterStateBroker, AdapterStateCallback, ServiceError,
    ThreadExecutor,
};

struct DemoService {
    callbacks: Mutex<Option<Arc<dyn AdapterStateCallback>>>,
}

impl AdapterService for DemoService {
    fn subscribe(&self, callbacks: Arc<dyn AdapterStateCallback>) -> Result<(), ServiceError> {
        *self.callbacks.lock().unwrap() = Some(callbacks);
        Ok(())
    }

    fn unsubscribe(&self, _callbacks: Arc<dyn AdapterStateCallback>) -> Result<(), ServiceError> {
        *self.callbacks.lock().unwrap() = None;
        Ok(())
    }
}

fn main() {
    init_logging(LoggingMode::Development).expect("failed to initialize logging");

    let service = Arc::new(DemoService {
        callbacks: Mutex::new(None),
    });
    let broker = AdapterStateBroker::new(service.clone());

    let (watcher, states) = watch::channel();
    broker.register(Arc::new(ThreadExecutor::new()), watcher);

    // Simulate adapter activity from another thread.
    let driver = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            let events = [
                (true, raw::SYSTEM_BOOT),
                (true, raw::SESSION_STARTED),
                (false, raw::ALL_SESSIONS_CLOSED),
            ];
            for (enabled, reason) in events {
                thread::sleep(Duration::from_millis(200));
                if let Some(callback) = service.callbacks.lock().unwrap().clone() {
                    callback.on_adapter_state_changed(enabled, reason);
                }
            }
        })
    };

    for state in states.timeout_iter(Duration::from_secs(1)).take(3) {
        println!("adapter is now {}", state);
    }

    driver.join().unwrap();
}
