//! Error types for the uwb-state crate.

/// Failure to hand a notification to an execution context.
///
/// The broker treats these as a per-notification drop: logged, never
/// retried, never reported back to the state change source.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The execution context has shut down
    #[error("Execution context has shut down")]
    Terminated,

    /// The execution context rejected the job
    #[error("Execution context rejected the notification: {0}")]
    Rejected(String),
}
