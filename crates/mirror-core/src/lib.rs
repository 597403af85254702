//! One-way directory mirroring
//!
//! This crate reproduces a *source* tree inside a *replica* tree, one full
//! pass at a time:
//!
//! - **sync**: the [`MirrorEngine`] pass (iterative traversal, mtime-based
//!   copy decision, deletion reconciliation) and the [`SyncAction`] events it
//!   reports through an injected [`ActionSink`]
//! - **settings**: [`MirrorSettings`] resolved from a config file and overrides
//! - **schedule**: the [`Scheduler`] driver that repeats passes on an interval
//!
//! # Architecture
//!
//! ```text
//!                  mirror-cli
//!                      |
//!                 mirror-core
//!                      |
//!                  mirror-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mirror_core::{MirrorEngine, SyncAction};
//!
//! fn example() -> mirror_core::Result<()> {
//!     let engine = MirrorEngine::new("/data/source", "/backup/replica");
//!     let mut actions: Vec<SyncAction> = Vec::new();
//!     let result = engine.synchronize(&mut actions)?;
//!     println!("{result}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod schedule;
pub mod settings;
pub mod sync;

pub use error::{Error, ItemError, Result};
pub use schedule::Scheduler;
pub use settings::{MirrorSettings, PartialSettings};
pub use sync::{
    ActionKind, ActionSink, MirrorEngine, SyncAction, SyncOptions, SyncResult, TracingSink,
};
