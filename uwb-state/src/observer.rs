//! Observer trait and registry identity.

use std::sync::Arc;

use crate::state::AdapterState;

/// Receives adapter state change notifications.
///
/// Implementations are foreign code from the broker's point of view: they run
/// on the [`Executor`](crate::executor::Executor) supplied at registration,
/// never under the broker's lock, and may re-enter
/// [`register`](crate::broker::AdapterStateBroker::register) or
/// [`unregister`](crate::broker::AdapterStateBroker::unregister).
pub trait AdapterStateObserver: Send + Sync {
    /// Called with the new state after every remote change, and once at
    /// registration time when a subscription is already live (catch-up).
    fn on_state_changed(&self, state: AdapterState);
}

/// Registry key with handle identity.
///
/// Two handles compare equal here iff they point at the same allocation;
/// structurally equal observers remain distinct registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

impl ObserverId {
    /// Identity of the given observer handle.
    pub fn of(observer: &Arc<dyn AdapterStateObserver>) -> Self {
        Self(Arc::as_ptr(observer) as *const () as usize)
    }
}
