//! Directory listing with entry classification

use std::borrow::Cow;
use std::ffi::OsString;
use std::fs::{self, FileType};
use std::path::Path;

use crate::{Error, Result};

/// What an entry is, as observed without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Anything else: symlinks, sockets, fifos, block and character devices
    Other,
}

impl EntryKind {
    /// Classify a file type. Symlinks are never followed.
    pub fn of(file_type: &FileType) -> Self {
        if file_type.is_symlink() {
            Self::Other
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// Classify whatever is at `path`, or `None` if nothing is there.
    ///
    /// A parent that is not a directory also means nothing is there.
    pub fn at(path: &Path) -> Result<Option<Self>> {
        match fs::symlink_metadata(path) {
            Ok(metadata) => Ok(Some(Self::of(&metadata.file_type()))),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immediate child of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl Entry {
    /// Lossy UTF-8 rendering of the name, for reporting.
    pub fn display_name(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }
}

/// List the immediate children of `dir`, sorted by name.
///
/// Fails as a whole if the directory cannot be opened or any entry cannot be
/// read; a partial listing is never returned, because callers use it to decide
/// what to delete.
pub fn list_dir(dir: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        entries.push(Entry {
            name: entry.file_name(),
            kind: EntryKind::of(&file_type),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_dir_classifies_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();

        let entries = list_dir(dir.path()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a");
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].name, "b.txt");
        assert_eq!(entries[1].kind, EntryKind::File);
    }

    #[test]
    fn kind_at_missing_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(EntryKind::at(&dir.path().join("missing")).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_other_even_when_pointing_at_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("target.txt"), "t").unwrap();
        std::os::unix::fs::symlink("target.txt", dir.path().join("link")).unwrap();

        let entries = list_dir(dir.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();

        assert_eq!(link.kind, EntryKind::Other);
    }
}
