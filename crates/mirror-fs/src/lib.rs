//! Filesystem primitives for folder-mirror
//!
//! Provides directory listing with entry classification, mtime-preserving
//! file replacement, tree removal, relative path handling and config loading.

pub mod config;
pub mod entry;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use entry::{Entry, EntryKind, list_dir};
pub use error::{Error, Result};
pub use path::RelPath;
