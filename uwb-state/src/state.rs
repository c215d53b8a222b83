//! Last known adapter state.

use serde::{Deserialize, Serialize};

use crate::reason::StateChangeReason;

/// Enabled flag plus the reason it last changed.
///
/// This is both the payload delivered to observers and the broker's
/// last-known-state record. Before any remote event arrives the state reads
/// disabled with an unknown reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterState {
    /// Whether the adapter is currently enabled
    pub enabled: bool,
    /// Cause of the most recent change
    pub reason: StateChangeReason,
}

impl AdapterState {
    /// Create a new state value.
    pub fn new(enabled: bool, reason: StateChangeReason) -> Self {
        Self { enabled, reason }
    }
}

impl Default for AdapterState {
    fn default() -> Self {
        Self {
            enabled: false,
            reason: StateChangeReason::Unknown,
        }
    }
}

impl std::fmt::Display for AdapterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let enabled = if self.enabled { "enabled" } else { "disabled" };
        write!(f, "{} ({})", enabled, self.reason)
    }
}
