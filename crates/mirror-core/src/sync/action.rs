//! Actions reported by a pass, and the pass tally

use mirror_fs::RelPath;
use serde::Serialize;

use crate::ItemError;

/// Something a pass did, or failed to do, to one entry.
///
/// Paths are relative to the mirrored roots.
#[derive(Debug)]
pub enum SyncAction {
    /// A source file was written to the replica.
    Copied { path: RelPath, bytes: u64 },
    /// A replica directory was created for a source directory.
    CreatedDirectory { path: RelPath },
    /// A replica-only file (or other non-directory entry) was deleted.
    RemovedFile { path: RelPath },
    /// A replica-only directory was deleted with everything beneath it.
    RemovedDirectory { path: RelPath },
    /// A source entry that is neither a file nor a directory was left alone.
    Skipped { path: RelPath },
    /// The entry could not be mirrored this pass.
    Failed { path: RelPath, cause: ItemError },
}

/// Discriminant of a [`SyncAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Copied,
    CreatedDirectory,
    RemovedFile,
    RemovedDirectory,
    Skipped,
    Failed,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copied => "copied",
            Self::CreatedDirectory => "created-directory",
            Self::RemovedFile => "removed-file",
            Self::RemovedDirectory => "removed-directory",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SyncAction {
    /// Get the path associated with this action.
    pub fn path(&self) -> &RelPath {
        match self {
            Self::Copied { path, .. } => path,
            Self::CreatedDirectory { path } => path,
            Self::RemovedFile { path } => path,
            Self::RemovedDirectory { path } => path,
            Self::Skipped { path } => path,
            Self::Failed { path, .. } => path,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Copied { .. } => ActionKind::Copied,
            Self::CreatedDirectory { .. } => ActionKind::CreatedDirectory,
            Self::RemovedFile { .. } => ActionKind::RemovedFile,
            Self::RemovedDirectory { .. } => ActionKind::RemovedDirectory,
            Self::Skipped { .. } => ActionKind::Skipped,
            Self::Failed { .. } => ActionKind::Failed,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copied { path, bytes } => write!(f, "copied {path} ({bytes} bytes)"),
            Self::CreatedDirectory { path } => write!(f, "created directory {path}"),
            Self::RemovedFile { path } => write!(f, "removed file {path}"),
            Self::RemovedDirectory { path } => write!(f, "removed directory {path}"),
            Self::Skipped { path } => write!(f, "skipped {path} (not a file or directory)"),
            Self::Failed { path, cause } => write!(f, "failed {path}: {cause}"),
        }
    }
}

/// Tally of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub copied: usize,
    pub created_dirs: usize,
    pub removed_files: usize,
    pub removed_dirs: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_copied: u64,
    /// Actions were planned but nothing was written
    pub dry_run: bool,
}

impl SyncResult {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Count one action.
    pub fn record(&mut self, action: &SyncAction) {
        match action {
            SyncAction::Copied { bytes, .. } => {
                self.copied += 1;
                self.bytes_copied += bytes;
            }
            SyncAction::CreatedDirectory { .. } => self.created_dirs += 1,
            SyncAction::RemovedFile { .. } => self.removed_files += 1,
            SyncAction::RemovedDirectory { .. } => self.removed_dirs += 1,
            SyncAction::Skipped { .. } => self.skipped += 1,
            SyncAction::Failed { .. } => self.failed += 1,
        }
    }

    /// Number of mutations made to the replica.
    pub fn changes(&self) -> usize {
        self.copied + self.created_dirs + self.removed_files + self.removed_dirs
    }

    /// No entry failed this pass.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for SyncResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} copied ({} bytes), {} directories created, {} files removed, {} directories removed, {} skipped, {} failed",
            self.copied,
            self.bytes_copied,
            self.created_dirs,
            self.removed_files,
            self.removed_dirs,
            self.skipped,
            self.failed
        )?;
        if self.dry_run {
            f.write_str(" (dry run)")?;
        }
        Ok(())
    }
}
