//! # uwb-state
//!
//! Adapter-state subscription management for the UWB SDK.
//!
//! ## Overview
//!
//! The adapter service owns a single hardware adapter shared by every client
//! in the process. This crate multiplexes any number of local observers onto
//! one remote subscription: the first registration establishes the
//! subscription lazily, the last removal tears it down, and every observer is
//! notified of state changes on the execution context it chose at
//! registration time.
//!
//! ## Key Features
//!
//! - **Single remote subscription**: at most one `subscribe` is ever active
//!   no matter how many observers register or unregister concurrently
//! - **Catch-up semantics**: an observer that registers after the last state
//!   change still receives the current state, without another remote call
//! - **Per-observer execution contexts**: each observer names the
//!   [`Executor`] its notifications run on
//! - **Contained failures**: a failed remote call never corrupts local
//!   bookkeeping and never strands an observer without a notification
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use uwb_state::{AdapterStateBroker, ThreadExecutor, watch};
//!
//! let broker = AdapterStateBroker::new(service);
//!
//! // Consume state changes by blocking iteration
//! let (watcher, states) = watch::channel();
//! broker.register(Arc::new(ThreadExecutor::new()), watcher);
//!
//! for state in states {
//!     println!("adapter is now {}", state);
//! }
//! ```
//!
//! ## Architecture
//!
//! One mutex per broker serializes the observer registry, the subscribed
//! flag, the last known state, and the decision to call the remote service.
//! Notifications are snapshotted under that lock and handed to executors
//! after it is released, so observer code never runs inside the broker's
//! critical section and may safely re-enter `register`/`unregister`.

pub mod broker;
pub mod error;
pub mod executor;
pub mod logging;
pub mod observer;
pub mod privilege;
pub mod reason;
pub mod state;
pub mod watch;

// Re-export main types for convenience
pub use broker::AdapterStateBroker;
pub use error::DispatchError;
pub use executor::{Executor, InlineExecutor, Job, ThreadExecutor, TokioExecutor};
pub use observer::{AdapterStateObserver, ObserverId};
pub use privilege::{NoPrivilege, PrivilegeGuard, PrivilegeScope, PrivilegeToken};
pub use reason::StateChangeReason;
pub use state::AdapterState;
pub use watch::{StateIterator, StateWatcher};

// Re-export the IPC surface consumers implement or inject
pub use uwb_ipc::{raw, AdapterService, AdapterStateCallback, RawReason, ServiceError};

/// Prelude module for convenient imports
///
/// ```rust
/// use uwb_state::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AdapterService, AdapterState, AdapterStateBroker, AdapterStateObserver, Executor,
        InlineExecutor, StateChangeReason, ThreadExecutor,
    };
}
