//! File replacement, directory creation and removal

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::{Error, Result};

/// Suffix of the hidden temporary files written during a copy.
pub const TEMP_SUFFIX: &str = ".mirror-tmp";

/// Last modification time of the file at `path`, following symlinks.
pub fn modified_time(path: &Path) -> Result<FileTime> {
    let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    Ok(FileTime::from_last_modification_time(&metadata))
}

/// Copy `src` over `dst`, carrying the source modification time across.
///
/// Content goes to a temporary file in the destination directory, gets the
/// source permissions and mtime applied, and is then renamed over `dst`, so
/// `dst` is either the old file or the complete new one. The temporary name
/// is short and randomly chosen, so it neither depends on the length of the
/// destination name nor replaces an existing entry. Returns the number of
/// bytes copied.
pub fn copy_preserving_mtime(src: &Path, dst: &Path) -> Result<u64> {
    let copy_error = |source| Error::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(src).map_err(|e| Error::io(src, e))?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    let parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut reader = File::open(src).map_err(copy_error)?;
    // Dropping `temp` on any early return deletes the temporary file.
    let mut temp = tempfile::Builder::new()
        .prefix(".")
        .suffix(TEMP_SUFFIX)
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;

    let bytes = io::copy(&mut reader, temp.as_file_mut()).map_err(copy_error)?;
    temp.as_file()
        .set_permissions(metadata.permissions())
        .map_err(|e| Error::io(temp.path(), e))?;
    filetime::set_file_mtime(temp.path(), mtime).map_err(|e| Error::io(temp.path(), e))?;

    temp.persist(dst).map_err(|e| Error::io(dst, e.error))?;

    tracing::trace!(from = %src.display(), to = %dst.display(), bytes, "copied file");
    Ok(bytes)
}

/// Create `path` and any missing ancestors.
pub fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Remove a single non-directory entry.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Remove a directory and everything beneath it.
pub fn remove_tree(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Canonicalize without UNC prefixes on Windows.
pub fn canonicalize(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| Error::io(path, e))
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
