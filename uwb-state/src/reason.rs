//! Semantic classification of adapter state change causes.

use serde::{Deserialize, Serialize};
use uwb_ipc::{raw, RawReason};

/// Cause of an adapter state change, derived from the raw wire code.
///
/// This is a closed set: every raw code the service emits maps onto one of
/// these variants, with [`StateChangeReason::Unknown`] absorbing anything
/// unmapped. `Unknown` is also the reason delivered when no subscription
/// could be established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateChangeReason {
    /// The last open ranging session was closed
    AllSessionsClosed,
    /// A ranging session was started while the adapter was idle
    SessionStarted,
    /// System policy toggled adapter availability
    SystemPolicy,
    /// The adapter finished initializing after boot
    SystemBoot,
    /// Unmapped wire code, or no cause available
    Unknown,
}

impl StateChangeReason {
    /// Translate a raw wire code into its semantic reason.
    ///
    /// Total: codes outside the known set normalize to
    /// [`StateChangeReason::Unknown`] instead of failing.
    pub fn from_raw(reason: RawReason) -> Self {
        match reason {
            raw::ALL_SESSIONS_CLOSED => Self::AllSessionsClosed,
            raw::SESSION_STARTED => Self::SessionStarted,
            raw::SYSTEM_POLICY => Self::SystemPolicy,
            raw::SYSTEM_BOOT => Self::SystemBoot,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for StateChangeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateChangeReason::AllSessionsClosed => write!(f, "all sessions closed"),
            StateChangeReason::SessionStarted => write!(f, "session started"),
            StateChangeReason::SystemPolicy => write!(f, "system policy"),
            StateChangeReason::SystemBoot => write!(f, "system boot"),
            StateChangeReason::Unknown => write!(f, "unknown"),
        }
    }
}
