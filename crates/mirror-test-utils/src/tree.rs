//! [`TestTree`] builder for mirror scenarios.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// A temporary directory holding a `source/` tree and a (not yet created)
/// `replica/` location, with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write_source("a.txt", "x");
/// tree.mkdir_source("sub");
/// assert!(tree.replica_path("a.txt").ends_with("replica/a.txt"));
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create a temporary directory with an empty `source/` in it.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("source")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn replica(&self) -> PathBuf {
        self.root().join("replica")
    }

    pub fn source_path(&self, rel: &str) -> PathBuf {
        self.source().join(rel)
    }

    pub fn replica_path(&self, rel: &str) -> PathBuf {
        self.replica().join(rel)
    }

    /// Write a source file, creating parent directories.
    pub fn write_source(&self, rel: &str, content: &str) -> PathBuf {
        write_file(&self.source_path(rel), content)
    }

    /// Write a replica file, creating parent directories (and the replica).
    pub fn write_replica(&self, rel: &str, content: &str) -> PathBuf {
        write_file(&self.replica_path(rel), content)
    }

    pub fn mkdir_source(&self, rel: &str) -> PathBuf {
        let path = self.source_path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn mkdir_replica(&self, rel: &str) -> PathBuf {
        let path = self.replica_path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Pin the modification time of `path` to `secs` after the epoch.
    pub fn set_mtime(&self, path: &Path, secs: i64) {
        filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    /// Read a replica file as text.
    pub fn read_replica(&self, rel: &str) -> String {
        let path = self.replica_path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that the replica mirrors the source: same entries, and for
    /// every file the same content and modification time.
    ///
    /// # Panics
    /// Panics with a diff of the two trees if they differ.
    pub fn assert_mirrored(&self) {
        let source = snapshot(&self.source());
        let replica = snapshot(&self.replica());
        assert_eq!(source, replica, "replica entries differ from source");

        for rel in source.iter().filter(|rel| !rel.ends_with('/')) {
            let (src, rep) = (self.source_path(rel), self.replica_path(rel));
            assert_eq!(
                fs::read(&src).unwrap(),
                fs::read(&rep).unwrap(),
                "content differs for {rel}"
            );
            assert_eq!(mtime(&src), mtime(&rep), "mtime differs for {rel}");
        }
    }

    /// Assert that `rel` does **not** exist under the replica.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_replica_missing(&self, rel: &str) {
        let path = self.replica_path(rel);
        assert!(
            fs::symlink_metadata(&path).is_err(),
            "Expected replica entry NOT to exist: {}",
            path.display()
        );
    }
}

fn write_file(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

/// Modification time of `path`.
pub fn mtime(path: &Path) -> FileTime {
    FileTime::from_last_modification_time(&fs::metadata(path).unwrap())
}

/// All entries under `root`, relative and `/`-separated.
///
/// Directories end with `/`, symlinks and other special entries with `@`.
/// Walks with an explicit stack so very deep trees are fine.
pub fn snapshot(root: &Path) -> BTreeSet<String> {
    let mut entries = BTreeSet::new();
    let mut pending = vec![(root.to_path_buf(), String::new())];

    while let Some((dir, prefix)) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let entry = entry.unwrap();
            let name = format!("{prefix}{}", entry.file_name().to_string_lossy());
            let file_type = entry.file_type().unwrap();
            if file_type.is_dir() {
                entries.insert(format!("{name}/"));
                pending.push((entry.path(), format!("{name}/")));
            } else if file_type.is_file() {
                entries.insert(name);
            } else {
                entries.insert(format!("{name}@"));
            }
        }
    }

    entries
}
