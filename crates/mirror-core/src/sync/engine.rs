//! MirrorEngine implementation
//!
//! A pass walks the source tree with an explicit work list of directory
//! pairs. Each popped pair is reconciled completely before the next one:
//! files are copied when missing or when their mtimes differ, subdirectories
//! are created and queued, then replica entries the source no longer has are
//! removed.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use mirror_fs::{EntryKind, RelPath, io, list_dir};

use super::{ActionSink, SyncAction, SyncResult};
use crate::{Error, ItemError, Result};

/// Options for a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Report what would change without touching the replica.
    pub dry_run: bool,
}

/// One directory level waiting to be reconciled.
#[derive(Debug)]
struct DirectoryPair {
    source: PathBuf,
    replica: PathBuf,
    relative: RelPath,
}

/// Engine for mirroring one source tree into one replica tree.
///
/// Holds nothing but the two roots and the options, so every call to
/// [`MirrorEngine::synchronize`] is a complete, independent pass.
#[derive(Debug, Clone)]
pub struct MirrorEngine {
    source: PathBuf,
    replica: PathBuf,
    options: SyncOptions,
}

impl MirrorEngine {
    pub fn new(source: impl Into<PathBuf>, replica: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    /// Run one full pass, reporting every action to `sink`.
    ///
    /// # Errors
    ///
    /// Fails before touching anything if the source root is not a directory,
    /// the replica root is not a directory (or cannot be created), or one
    /// root contains the other. Failures on individual entries are reported
    /// as [`SyncAction::Failed`] and do not stop the pass.
    pub fn synchronize(&self, sink: &mut dyn ActionSink) -> Result<SyncResult> {
        let replica_exists = self.check_roots()?;

        let mut pass = Pass {
            sink,
            result: SyncResult::new(self.options.dry_run),
            dry_run: self.options.dry_run,
        };

        if !replica_exists {
            if !pass.dry_run {
                io::create_dir_all(&self.replica).map_err(|source| Error::ReplicaUnavailable {
                    path: self.replica.clone(),
                    source,
                })?;
            }
            pass.emit(SyncAction::CreatedDirectory {
                path: RelPath::root(),
            });
        }

        let mut work_list = vec![DirectoryPair {
            source: self.source.clone(),
            replica: self.replica.clone(),
            relative: RelPath::root(),
        }];

        while let Some(pair) = work_list.pop() {
            pass.reconcile_directory(pair, &mut work_list);
        }

        Ok(pass.result)
    }

    /// Validate both roots. Returns whether the replica root already exists.
    fn check_roots(&self) -> Result<bool> {
        match fs::metadata(&self.source) {
            Ok(metadata) if metadata.is_dir() => {}
            _ => {
                return Err(Error::SourceNotFound {
                    path: self.source.clone(),
                });
            }
        }

        let replica_exists = match fs::metadata(&self.replica) {
            Ok(metadata) if metadata.is_dir() => true,
            Ok(_) => {
                return Err(Error::ReplicaNotDirectory {
                    path: self.replica.clone(),
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                return Err(Error::ReplicaUnavailable {
                    path: self.replica.clone(),
                    source: mirror_fs::Error::io(&self.replica, e),
                });
            }
        };

        let source_root = io::canonicalize(&self.source)?;
        let replica = canonical_target(&self.replica).map_err(|source| Error::ReplicaUnavailable {
            path: self.replica.clone(),
            source,
        })?;

        if replica.starts_with(&source_root) {
            return Err(Error::ReplicaInsideSource {
                source_root,
                replica,
            });
        }
        if source_root.starts_with(&replica) {
            return Err(Error::SourceInsideReplica {
                source_root,
                replica,
            });
        }

        Ok(replica_exists)
    }
}

/// Canonical form of a path that may not exist yet: the deepest existing
/// ancestor is canonicalized and the missing components are appended.
fn canonical_target(path: &Path) -> mirror_fs::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        match io::canonicalize(existing) {
            Ok(mut canonical) => {
                canonical.extend(missing.iter().rev());
                return Ok(canonical);
            }
            Err(e) if e.is_not_found() => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = if parent.as_os_str().is_empty() {
                        Path::new(".")
                    } else {
                        parent
                    };
                }
                _ => return Err(e),
            },
            Err(e) => return Err(e),
        }
    }
}

/// State of a pass in progress.
struct Pass<'a> {
    sink: &'a mut dyn ActionSink,
    result: SyncResult,
    dry_run: bool,
}

impl Pass<'_> {
    fn emit(&mut self, action: SyncAction) {
        self.result.record(&action);
        self.sink.record(action);
    }

    fn fail(&mut self, path: RelPath, cause: ItemError) {
        self.emit(SyncAction::Failed { path, cause });
    }

    /// Mirror the immediate children of one directory, queue its
    /// subdirectories, then remove what the replica has in excess.
    fn reconcile_directory(&mut self, pair: DirectoryPair, work_list: &mut Vec<DirectoryPair>) {
        tracing::debug!(path = %pair.relative, pending = work_list.len(), "reconciling directory");

        let entries = match list_dir(&pair.source) {
            Ok(entries) => entries,
            Err(e) => {
                // Without a trustworthy listing nothing here can be judged stale.
                self.fail(pair.relative, ItemError::List(e));
                return;
            }
        };

        let mut mirrored: HashSet<OsString> = HashSet::with_capacity(entries.len());

        for entry in entries {
            let relative = pair.relative.join(&entry.display_name());
            let source_path = pair.source.join(&entry.name);
            let replica_path = pair.replica.join(&entry.name);

            match entry.kind {
                EntryKind::File => {
                    self.mirror_file(&source_path, &replica_path, relative);
                    mirrored.insert(entry.name);
                }
                EntryKind::Directory => {
                    if self.ensure_directory(&replica_path, &relative) {
                        work_list.push(DirectoryPair {
                            source: source_path,
                            replica: replica_path,
                            relative,
                        });
                    }
                    mirrored.insert(entry.name);
                }
                EntryKind::Other => {
                    self.emit(SyncAction::Skipped { path: relative });
                }
            }
        }

        self.remove_stale(&pair, &mirrored);
    }

    /// Copy a source file unless the replica already has it with the same mtime.
    fn mirror_file(&mut self, source: &Path, replica: &Path, relative: RelPath) {
        let needs_copy = match EntryKind::at(replica) {
            Ok(None) => true,
            Ok(Some(EntryKind::File)) => {
                match (io::modified_time(source), io::modified_time(replica)) {
                    (Ok(source_mtime), Ok(replica_mtime)) => source_mtime != replica_mtime,
                    (Err(e), _) | (_, Err(e)) => {
                        self.fail(relative, ItemError::Metadata(e));
                        return;
                    }
                }
            }
            Ok(Some(EntryKind::Directory)) => {
                if !self.remove(replica, relative.clone(), EntryKind::Directory) {
                    return;
                }
                true
            }
            // The rename at the end of the copy replaces the entry itself.
            Ok(Some(EntryKind::Other)) => true,
            Err(e) => {
                self.fail(relative, ItemError::Metadata(e));
                return;
            }
        };

        if !needs_copy {
            return;
        }

        if self.dry_run {
            let bytes = fs::metadata(source).map(|m| m.len()).unwrap_or_default();
            self.emit(SyncAction::Copied {
                path: relative,
                bytes,
            });
            return;
        }

        match io::copy_preserving_mtime(source, replica) {
            Ok(bytes) => self.emit(SyncAction::Copied {
                path: relative,
                bytes,
            }),
            Err(e) => self.fail(relative, ItemError::Copy(e)),
        }
    }

    /// Make sure the replica counterpart of a source directory is a directory.
    ///
    /// Returns whether the subtree can be descended into.
    fn ensure_directory(&mut self, replica: &Path, relative: &RelPath) -> bool {
        match EntryKind::at(replica) {
            Ok(Some(EntryKind::Directory)) => true,
            Ok(Some(kind)) => {
                self.remove(replica, relative.clone(), kind) && self.create_directory(replica, relative)
            }
            Ok(None) => self.create_directory(replica, relative),
            Err(e) => {
                self.fail(relative.clone(), ItemError::Metadata(e));
                false
            }
        }
    }

    fn create_directory(&mut self, replica: &Path, relative: &RelPath) -> bool {
        if !self.dry_run
            && let Err(e) = io::create_dir_all(replica)
        {
            self.fail(relative.clone(), ItemError::CreateDir(e));
            return false;
        }
        self.emit(SyncAction::CreatedDirectory {
            path: relative.clone(),
        });
        true
    }

    /// Delete every replica entry whose name the source listing did not have.
    fn remove_stale(&mut self, pair: &DirectoryPair, mirrored: &HashSet<OsString>) {
        let replica_entries = match list_dir(&pair.replica) {
            Ok(entries) => entries,
            // In a dry run the directory may only exist on paper.
            Err(_) if self.dry_run && !pair.replica.is_dir() => return,
            Err(e) => {
                self.fail(pair.relative.clone(), ItemError::List(e));
                return;
            }
        };

        for entry in replica_entries {
            if mirrored.contains(&entry.name) {
                continue;
            }
            let relative = pair.relative.join(&entry.display_name());
            self.remove(&pair.replica.join(&entry.name), relative, entry.kind);
        }
    }

    /// Remove one replica entry, a directory as a whole subtree.
    ///
    /// Returns whether the entry is gone.
    fn remove(&mut self, path: &Path, relative: RelPath, kind: EntryKind) -> bool {
        let outcome = match (kind, self.dry_run) {
            (_, true) => Ok(()),
            (EntryKind::Directory, false) => io::remove_tree(path),
            (_, false) => io::remove_file(path),
        };

        match outcome {
            Ok(()) if kind == EntryKind::Directory => {
                self.emit(SyncAction::RemovedDirectory { path: relative });
                true
            }
            Ok(()) => {
                self.emit(SyncAction::RemovedFile { path: relative });
                true
            }
            Err(e) => {
                self.fail(relative, ItemError::Delete(e));
                false
            }
        }
    }
}
