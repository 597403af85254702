//! Tree-relative path handling for reporting

/// A path relative to a mirrored root, components joined by `/`.
///
/// The engine keeps real filesystem paths as `PathBuf`s paired per directory
/// level; `RelPath` is the root-independent name of an entry used when
/// reporting actions, so the same entry reads identically for source and
/// replica. The root itself is the empty path and displays as `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath {
    /// Components joined by `/`, no leading, trailing or doubled separators
    inner: String,
}

impl RelPath {
    /// The root of a tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a RelPath from a `/`-separated string.
    ///
    /// Empty and `.` components and any leading separator are dropped. Other
    /// characters, backslashes included, are kept as they are.
    pub fn new(path: &str) -> Self {
        let inner = path
            .split('/')
            .filter(|c| !c.is_empty() && *c != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self { inner }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Append one entry name as a new last component.
    ///
    /// `name` is a single directory entry name and is taken verbatim, so a
    /// backslash in it stays part of the name.
    pub fn join(&self, name: &str) -> Self {
        let inner = if self.is_root() {
            name.to_string()
        } else {
            format!("{}/{}", self.inner, name)
        };
        Self { inner }
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            f.write_str(&self.inner)
        }
    }
}

impl From<&str> for RelPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
