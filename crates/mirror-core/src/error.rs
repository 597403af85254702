//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a pass before it touches anything, or settings errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source root missing or not a directory
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Replica root exists but is not a directory
    #[error("Replica path exists and is not a directory: {path}")]
    ReplicaNotDirectory { path: PathBuf },

    /// Replica root could not be inspected or created
    #[error("Replica directory unavailable at {path}: {source}")]
    ReplicaUnavailable {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// Replica root is the source root or lies beneath it
    #[error("Replica {replica} is inside source {source_root}")]
    ReplicaInsideSource {
        source_root: PathBuf,
        replica: PathBuf,
    },

    /// Source root lies beneath the replica root
    #[error("Source {source_root} is inside replica {replica}")]
    SourceInsideReplica {
        source_root: PathBuf,
        replica: PathBuf,
    },

    /// A required setting was given neither on the command line nor in config
    #[error("Missing setting: {name}")]
    MissingSetting { name: &'static str },

    /// Interval must be at least one second
    #[error("Invalid interval: {secs} seconds")]
    InvalidInterval { secs: u64 },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}

/// Why a single entry could not be mirrored.
///
/// Carried by [`crate::SyncAction::Failed`]; never aborts the pass.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("failed to list directory: {0}")]
    List(#[source] mirror_fs::Error),

    #[error("failed to read metadata: {0}")]
    Metadata(#[source] mirror_fs::Error),

    #[error("failed to copy file: {0}")]
    Copy(#[source] mirror_fs::Error),

    #[error("failed to create directory: {0}")]
    CreateDir(#[source] mirror_fs::Error),

    #[error("failed to delete: {0}")]
    Delete(#[source] mirror_fs::Error),
}
