//! Type-safe absolute paths
//!
//! Everything the bootstrap touches is addressed by an absolute path once the
//! program has located itself. [`AbsPath`] makes that invariant part of the type.
//!
//! # Examples
//!
//! ```
//! use repoboot_core::path::AbsPath;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = AbsPath::new("/src/project".into())?;
//! let shims = repo.join("tools/git-hooks");
//! assert_eq!(shims.as_path().to_str().unwrap(), "/src/project/tools/git-hooks");
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// An absolute path on the filesystem
///
/// The path is not required to exist and is not required to be canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbsPath(PathBuf);

impl AbsPath {
    /// Create a new `AbsPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    ///
    /// # Examples
    ///
    /// ```
    /// use repoboot_core::path::AbsPath;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let abs = AbsPath::new("/usr/bin".into())?;
    /// assert!(abs.as_path().is_absolute());
    ///
    /// assert!(AbsPath::new("relative/path".into()).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.is_absolute() {
            Ok(AbsPath(path))
        } else {
            Err(Error::PathNotAbsolute { path })
        }
    }

    /// Create a new `AbsPath` from a reference to a `Path`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::new(path.to_path_buf())
    }

    /// Make `path` absolute against `base` if it is relative
    ///
    /// Absolute inputs are returned unchanged; no normalization is performed.
    pub fn resolve_against(base: &AbsPath, path: &Path) -> Self {
        AbsPath(base.0.join(path))
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Convert to a `PathBuf`
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Join a path onto this one
    ///
    /// Joining an absolute path replaces `self`, matching [`Path::join`], so the
    /// result is always absolute.
    pub fn join(&self, path: impl AsRef<Path>) -> Self {
        AbsPath(self.0.join(path))
    }

    /// Get the parent directory
    ///
    /// Returns `None` if this is the root directory.
    pub fn parent(&self) -> Option<Self> {
        self.0.parent().map(|p| AbsPath(p.to_path_buf()))
    }

    /// Get the final component as UTF-8, if any
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }
}

impl AsRef<Path> for AbsPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for AbsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_rejects_relative_path() {
        let err = AbsPath::new(PathBuf::from("tools/hooks.d")).unwrap_err();
        assert!(matches!(err, Error::PathNotAbsolute { .. }));
    }

    #[test]
    fn test_join_relative_stays_under_base() {
        let base = AbsPath::new(PathBuf::from("/repo")).unwrap();
        assert_eq!(base.join("tools").as_path(), Path::new("/repo/tools"));
    }

    #[test]
    fn test_join_absolute_replaces_base() {
        let base = AbsPath::new(PathBuf::from("/repo/bin")).unwrap();
        let joined = base.join("/opt/shared/hook-runner");
        assert_eq!(joined.as_path(), Path::new("/opt/shared/hook-runner"));
    }

    #[test]
    fn test_resolve_against_keeps_dot_dot() {
        let base = AbsPath::new(PathBuf::from("/repo/bin")).unwrap();
        let resolved = AbsPath::resolve_against(&base, Path::new("../tools/repoboot"));
        assert_eq!(resolved.as_path(), Path::new("/repo/bin/../tools/repoboot"));
    }

    #[test]
    fn test_parent_and_file_name() {
        let path = AbsPath::new(PathBuf::from("/repo/.git/hooks/pre-commit")).unwrap();
        assert_eq!(path.file_name(), Some("pre-commit"));
        assert_eq!(
            path.parent().unwrap().as_path(),
            Path::new("/repo/.git/hooks")
        );

        let root = AbsPath::new(PathBuf::from("/")).unwrap();
        assert!(root.parent().is_none());
    }
}
