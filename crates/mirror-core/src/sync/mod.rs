//! Mirror engine for one-way directory synchronization
//!
//! This module provides:
//! - **engine**: a single full pass from source to replica
//! - **action**: the events a pass reports and the per-pass tally
//! - **sink**: where those events go

mod action;
mod engine;
mod sink;

pub use action::{ActionKind, SyncAction, SyncResult};
pub use engine::{MirrorEngine, SyncOptions};
pub use sink::{ActionSink, TracingSink};
