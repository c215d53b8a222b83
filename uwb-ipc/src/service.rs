//! Traits describing the remote adapter service surface.

use std::sync::Arc;

use crate::error::ServiceError;

/// Wire-level reason code attached to adapter state change events.
pub type RawReason = i32;

/// Raw reason codes emitted by the adapter service.
///
/// The service may emit codes outside this set; consumers must treat any
/// unrecognized value as unknown rather than fail.
pub mod raw {
    use super::RawReason;

    /// A ranging session was started while the adapter was idle.
    pub const SESSION_STARTED: RawReason = 0;
    /// The last open ranging session was closed.
    pub const ALL_SESSIONS_CLOSED: RawReason = 1;
    /// System policy toggled adapter availability.
    pub const SYSTEM_POLICY: RawReason = 2;
    /// The adapter finished initializing after boot.
    pub const SYSTEM_BOOT: RawReason = 3;
    /// The service could not determine a cause.
    pub const UNKNOWN: RawReason = 4;
}

/// Inbound callback handle registered with the adapter service.
///
/// The service invokes this at arbitrary times after a successful
/// `subscribe`, until `unsubscribe` completes. One more invocation may race
/// an unsubscribe; implementations must tolerate that safely.
pub trait AdapterStateCallback: Send + Sync {
    /// Called by the service whenever the adapter's enabled state changes.
    fn on_adapter_state_changed(&self, enabled: bool, reason: RawReason);
}

/// Client-side handle to the remote adapter service.
///
/// Implementations wrap the platform IPC stubs. `subscribe` is not assumed
/// to be idempotent; callers hold at most one active subscription per
/// callback handle.
pub trait AdapterService: Send + Sync {
    /// Register a callback handle with the service.
    fn subscribe(&self, callbacks: Arc<dyn AdapterStateCallback>) -> Result<(), ServiceError>;

    /// Remove a previously registered callback handle.
    fn unsubscribe(&self, callbacks: Arc<dyn AdapterStateCallback>) -> Result<(), ServiceError>;
}
