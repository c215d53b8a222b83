//! Error types for the uwb-ipc crate.

/// Errors surfaced by calls into the remote adapter service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The IPC transport to the service failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The adapter service is not reachable
    #[error("Adapter service unavailable: {0}")]
    Unavailable(String),

    /// The service actively rejected the call
    #[error("Call rejected by adapter service: {0}")]
    Rejected(String),
}

/// Convenience type alias for Results using ServiceError.
pub type Result<T> = std::result::Result<T, ServiceError>;
