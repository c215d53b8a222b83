//! Adapter-state subscription broker.
//!
//! Multiplexes any number of local observers onto a single remote
//! subscription. The first registration establishes the remote subscription
//! lazily; removing the last observer tears it down. Every observer is
//! notified on its own execution context, and late registrants catch up with
//! the last known state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use uwb_ipc::{AdapterService, AdapterStateCallback, RawReason};

use crate::executor::Executor;
use crate::observer::{AdapterStateObserver, ObserverId};
use crate::privilege::{NoPrivilege, PrivilegeGuard, PrivilegeScope};
use crate::reason::StateChangeReason;
use crate::state::AdapterState;

/// A single registration: the observer plus its dispatch target.
struct Registration {
    observer: Arc<dyn AdapterStateObserver>,
    executor: Arc<dyn Executor>,
}

/// Everything the broker mutates, behind one lock.
///
/// Invariant: `subscribed` is true iff the registry is non-empty, except
/// after a failed remote subscribe, where observers remain registered with
/// no live subscription until a later registration retries the call.
struct BrokerState {
    registry: HashMap<ObserverId, Registration>,
    subscribed: bool,
    last_state: AdapterState,
}

/// A notification snapshotted under the lock, dispatched after release.
struct Notification {
    observer: Arc<dyn AdapterStateObserver>,
    executor: Arc<dyn Executor>,
    state: AdapterState,
}

/// State shared between broker handles and the service-facing callback.
struct BrokerShared {
    service: Arc<dyn AdapterService>,
    privilege: Arc<dyn PrivilegeScope>,
    state: Mutex<BrokerState>,
}

impl BrokerShared {
    /// Record a remote state change and fan it out.
    ///
    /// The registry is snapshotted under the lock and the handoffs happen
    /// after release, so observer code never runs inside the critical
    /// section.
    fn apply_remote_change(&self, enabled: bool, reason: RawReason) {
        let notifications: Vec<Notification> = {
            let mut state = self.state.lock();

            let next = AdapterState::new(enabled, StateChangeReason::from_raw(reason));
            state.last_state = next;
            tracing::debug!("Adapter state changed: {}", next);

            state
                .registry
                .values()
                .map(|registration| Notification {
                    observer: Arc::clone(&registration.observer),
                    executor: Arc::clone(&registration.executor),
                    state: next,
                })
                .collect()
        };

        for notification in notifications {
            self.dispatch(notification);
        }
    }

    /// Hand one notification to its execution context under elevation.
    ///
    /// Never called with the broker lock held; the observer may re-enter
    /// the broker from its execution context.
    fn dispatch(&self, notification: Notification) {
        let Notification {
            observer,
            executor,
            state,
        } = notification;
        let job = Box::new(move || observer.on_state_changed(state));

        let _elevated = PrivilegeGuard::acquire(self.privilege.as_ref());
        if let Err(err) = executor.execute(job) {
            // Fire-and-forget: a rejected notification is dropped for that
            // observer only.
            tracing::debug!("Dropped state notification: {}", err);
        }
    }
}

/// Callback handle registered with the remote service.
///
/// Kept alive by the broker for its whole lifetime so the service sees one
/// stable handle identity across subscribe/unsubscribe cycles.
struct CallbackRelay {
    shared: Arc<BrokerShared>,
}

impl AdapterStateCallback for CallbackRelay {
    fn on_adapter_state_changed(&self, enabled: bool, reason: RawReason) {
        self.shared.apply_remote_change(enabled, reason);
    }
}

/// Multiplexes local observers onto one remote adapter subscription.
///
/// Clones share the same underlying broker, so any handle can register or
/// unregister observers. The broker registers its own callback relay with
/// [`AdapterService::subscribe`] when the first observer arrives.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use uwb_state::{AdapterStateBroker, ThreadExecutor};
///
/// let broker = AdapterStateBroker::new(service);
/// broker.register(Arc::new(ThreadExecutor::new()), observer);
/// ```
pub struct AdapterStateBroker {
    shared: Arc<BrokerShared>,
    callback: Arc<CallbackRelay>,
}

impl AdapterStateBroker {
    /// Create a broker over the given service handle.
    pub fn new(service: Arc<dyn AdapterService>) -> Self {
        Self::with_privilege_scope(service, Arc::new(NoPrivilege))
    }

    /// Create a broker that elevates through `privilege` around every
    /// notification handoff.
    pub fn with_privilege_scope(
        service: Arc<dyn AdapterService>,
        privilege: Arc<dyn PrivilegeScope>,
    ) -> Self {
        let shared = Arc::new(BrokerShared {
            service,
            privilege,
            state: Mutex::new(BrokerState {
                registry: HashMap::new(),
                subscribed: false,
                last_state: AdapterState::default(),
            }),
        });
        let callback = Arc::new(CallbackRelay {
            shared: Arc::clone(&shared),
        });

        Self { shared, callback }
    }

    /// Register an observer, notified on `executor`.
    ///
    /// Idempotent: a handle that is already registered keeps its original
    /// registration, even if a different executor is supplied.
    ///
    /// The first observer triggers the remote subscribe. If that call fails,
    /// the observer stays registered without a live subscription and
    /// receives one synthetic disabled/unknown notification instead of
    /// waiting silently; a later registration retries the subscribe.
    /// Registering while the subscription is already active delivers one
    /// catch-up notification carrying the last known state, with no further
    /// remote call.
    pub fn register(&self, executor: Arc<dyn Executor>, observer: Arc<dyn AdapterStateObserver>) {
        let pending = {
            let mut state = self.shared.state.lock();

            let id = ObserverId::of(&observer);
            if state.registry.contains_key(&id) {
                return;
            }

            state.registry.insert(
                id,
                Registration {
                    observer: Arc::clone(&observer),
                    executor: Arc::clone(&executor),
                },
            );
            tracing::debug!(
                "Registered adapter state observer ({} active)",
                state.registry.len()
            );

            if state.subscribed {
                // Catch-up: no remote call, hand the new observer the
                // current state.
                Notification {
                    observer,
                    executor,
                    state: state.last_state,
                }
            } else {
                match self.shared.service.subscribe(self.callback_handle()) {
                    Ok(()) => {
                        state.subscribed = true;
                        return;
                    }
                    Err(err) => {
                        tracing::warn!("Failed to subscribe to adapter service: {}", err);
                        // The observer stays registered without a live
                        // subscription; report the adapter as off rather
                        // than leaving the caller waiting.
                        Notification {
                            observer,
                            executor,
                            state: AdapterState::default(),
                        }
                    }
                }
            }
        };

        self.shared.dispatch(pending);
    }

    /// Remove an observer.
    ///
    /// No-op for handles that were never registered. Removing the last
    /// observer tears down the remote subscription; if that call fails the
    /// broker still records itself as unsubscribed, so the next
    /// registration starts from a clean slate.
    pub fn unregister(&self, observer: &Arc<dyn AdapterStateObserver>) {
        let mut state = self.shared.state.lock();

        if state.registry.remove(&ObserverId::of(observer)).is_none() {
            return;
        }
        tracing::debug!(
            "Unregistered adapter state observer ({} active)",
            state.registry.len()
        );

        if state.registry.is_empty() && state.subscribed {
            if let Err(err) = self.shared.service.unsubscribe(self.callback_handle()) {
                tracing::warn!("Failed to unsubscribe from adapter service: {}", err);
            }
            state.subscribed = false;
        }
    }

    /// The last state reported by the service, or the disabled/unknown
    /// default before any event has arrived.
    pub fn last_known_state(&self) -> AdapterState {
        self.shared.state.lock().last_state
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.state.lock().registry.len()
    }

    /// Whether the remote subscription is currently active.
    pub fn is_subscribed(&self) -> bool {
        self.shared.state.lock().subscribed
    }

    fn callback_handle(&self) -> Arc<dyn AdapterStateCallback> {
        self.callback.clone()
    }
}

impl Clone for AdapterStateBroker {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl std::fmt::Debug for AdapterStateBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("AdapterStateBroker")
            .field("observers", &state.registry.len())
            .field("subscribed", &state.subscribed)
            .field("last_state", &state.last_state)
            .finish()
    }
}
