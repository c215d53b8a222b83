//! # uwb-ipc
//!
//! IPC surface for the UWB adapter service.
//!
//! This crate defines the traits through which the rest of the SDK reaches
//! the stateful adapter service: two fallible calls (`subscribe` /
//! `unsubscribe`) and one inbound callback. Production builds back these
//! traits with the platform IPC stubs; tests implement the same traits with
//! in-process doubles, so nothing above this crate depends on real IPC.

mod error;
mod service;

pub use error::*;
pub use service::*;
