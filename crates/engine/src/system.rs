//! System abstraction for filesystem operations
//!
//! This module provides a trait-based abstraction over the filesystem
//! operations the bootstrap needs: stat/readlink for symlink resolution,
//! symlink creation and replacement for hook linking, and a one-level
//! directory listing for extension discovery.

use crate::{AbsPath, Error, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Abstraction over filesystem operations
///
/// This trait allows us to implement different backends:
/// - `RealSystem`: Actual filesystem operations
/// - `RecordingSystem`: Delegates to another system and records every write
pub trait System {
    /// Whether `path` itself is a symbolic link (not followed)
    fn is_symlink(&self, path: &AbsPath) -> bool;

    /// Whether anything exists at `path` without following a final symlink
    fn entry_exists(&self, path: &AbsPath) -> bool;

    /// Whether `path` exists after following symlinks
    fn exists(&self, path: &AbsPath) -> bool;

    /// Whether `path` resolves to a regular file with an execute bit set
    fn is_executable_file(&self, path: &AbsPath) -> bool;

    /// Read the target of a symbolic link, exactly as stored
    fn read_link(&self, path: &AbsPath) -> Result<PathBuf>;

    /// Resolve `path` to a canonical, symlink-free absolute path
    fn canonicalize(&self, path: &AbsPath) -> Result<AbsPath>;

    /// List the entries directly inside a directory
    fn read_dir(&self, path: &AbsPath) -> Result<Vec<AbsPath>>;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &AbsPath) -> Result<()>;

    /// Remove a file, symlink, or directory tree
    fn remove(&self, path: &AbsPath) -> Result<()>;

    /// Create a symbolic link at `link` pointing to `target`
    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()>;
}

/// Replace whatever is at `link` with a symlink to `target`
///
/// Equivalent to `ln -sfn`, except that a real directory at `link` is removed
/// rather than receiving the link inside it.
pub fn force_symlink(system: &dyn System, target: &Path, link: &AbsPath) -> Result<()> {
    if system.entry_exists(link) {
        tracing::debug!(link = %link, "Replacing existing entry");
        system.remove(link)?;
    }
    system.symlink(target, link)
}

/// Real filesystem implementation
///
/// This implementation performs actual filesystem operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSystem;

impl System for RealSystem {
    fn is_symlink(&self, path: &AbsPath) -> bool {
        path.as_path().is_symlink()
    }

    fn entry_exists(&self, path: &AbsPath) -> bool {
        fs::symlink_metadata(path.as_path()).is_ok()
    }

    fn exists(&self, path: &AbsPath) -> bool {
        path.as_path().exists()
    }

    fn is_executable_file(&self, path: &AbsPath) -> bool {
        let Ok(metadata) = fs::metadata(path.as_path()) else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o111 != 0
        }

        #[cfg(not(unix))]
        {
            true
        }
    }

    fn read_link(&self, path: &AbsPath) -> Result<PathBuf> {
        fs::read_link(path.as_path())
            .map_err(|e| Error::path_io("Failed to read link", path.as_path(), e))
    }

    fn canonicalize(&self, path: &AbsPath) -> Result<AbsPath> {
        let canonical = fs::canonicalize(path.as_path())
            .map_err(|e| Error::path_io("Failed to resolve", path.as_path(), e))?;
        AbsPath::new(canonical)
    }

    fn read_dir(&self, path: &AbsPath) -> Result<Vec<AbsPath>> {
        walkdir::WalkDir::new(path.as_path())
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .map(|entry| {
                let entry = entry.map_err(|e| {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    Error::path_io("Failed to read directory", path.as_path(), source)
                })?;
                Ok(path.join(entry.file_name()))
            })
            .collect()
    }

    fn create_dir_all(&self, path: &AbsPath) -> Result<()> {
        fs::create_dir_all(path.as_path())
            .map_err(|e| Error::path_io("Failed to create directory", path.as_path(), e))
    }

    fn remove(&self, path: &AbsPath) -> Result<()> {
        let metadata = fs::symlink_metadata(path.as_path())
            .map_err(|e| Error::path_io("Failed to stat", path.as_path(), e))?;
        let result = if metadata.is_dir() {
            fs::remove_dir_all(path.as_path())
        } else {
            fs::remove_file(path.as_path())
        };
        result.map_err(|e| Error::path_io("Failed to remove", path.as_path(), e))
    }

    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link.as_path())
                .map_err(|e| Error::path_io("Failed to create symlink", link.as_path(), e))
        }

        #[cfg(windows)]
        {
            // On Windows, we need to check if target is a dir or file
            let result = if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link.as_path())
            } else {
                std::os::windows::fs::symlink_file(target, link.as_path())
            };
            result.map_err(|e| Error::path_io("Failed to create symlink", link.as_path(), e))
        }
    }
}

/// A filesystem mutation performed through a [`RecordingSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a directory tree
    CreateDir { path: AbsPath },
    /// Remove a path
    Remove { path: AbsPath },
    /// Create a symlink
    Symlink { link: AbsPath, target: PathBuf },
}

/// System that forwards to another system and records every mutation
///
/// Reads are not recorded. Useful to assert that an idempotent step performed
/// no writes at all.
pub struct RecordingSystem<'a> {
    inner: &'a dyn System,
    operations: RefCell<Vec<Operation>>,
}

impl<'a> RecordingSystem<'a> {
    /// Wrap `inner`
    pub fn new(inner: &'a dyn System) -> Self {
        Self {
            inner,
            operations: RefCell::new(Vec::new()),
        }
    }

    /// Get the list of mutations performed so far
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.borrow().clone()
    }

    fn record(&self, op: Operation) {
        self.operations.borrow_mut().push(op);
    }
}

impl System for RecordingSystem<'_> {
    fn is_symlink(&self, path: &AbsPath) -> bool {
        self.inner.is_symlink(path)
    }

    fn entry_exists(&self, path: &AbsPath) -> bool {
        self.inner.entry_exists(path)
    }

    fn exists(&self, path: &AbsPath) -> bool {
        self.inner.exists(path)
    }

    fn is_executable_file(&self, path: &AbsPath) -> bool {
        self.inner.is_executable_file(path)
    }

    fn read_link(&self, path: &AbsPath) -> Result<PathBuf> {
        self.inner.read_link(path)
    }

    fn canonicalize(&self, path: &AbsPath) -> Result<AbsPath> {
        self.inner.canonicalize(path)
    }

    fn read_dir(&self, path: &AbsPath) -> Result<Vec<AbsPath>> {
        self.inner.read_dir(path)
    }

    fn create_dir_all(&self, path: &AbsPath) -> Result<()> {
        self.record(Operation::CreateDir { path: path.clone() });
        self.inner.create_dir_all(path)
    }

    fn remove(&self, path: &AbsPath) -> Result<()> {
        self.record(Operation::Remove { path: path.clone() });
        self.inner.remove(path)
    }

    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()> {
        self.record(Operation::Symlink {
            link: link.clone(),
            target: target.to_path_buf(),
        });
        self.inner.symlink(target, link)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    fn abs(path: &Path) -> AbsPath {
        AbsPath::from_path(path).unwrap()
    }

    #[test]
    fn test_force_symlink_replaces_file() {
        let temp = TempDir::new().unwrap();
        let link = abs(&temp.path().join("pre-commit"));
        fs::write(link.as_path(), "old").unwrap();

        force_symlink(&RealSystem, Path::new("/bin/true"), &link).unwrap();

        assert_eq!(
            fs::read_link(link.as_path()).unwrap(),
            PathBuf::from("/bin/true")
        );
    }

    #[test]
    fn test_force_symlink_replaces_directory() {
        let temp = TempDir::new().unwrap();
        let link = abs(&temp.path().join("hooks.d"));
        fs::create_dir_all(link.as_path().join("pre-commit")).unwrap();
        let target = temp.path().join("source");
        fs::create_dir(&target).unwrap();

        force_symlink(&RealSystem, &target, &link).unwrap();

        assert!(link.as_path().is_symlink());
        assert_eq!(fs::read_link(link.as_path()).unwrap(), target);
    }

    #[test]
    fn test_force_symlink_replaces_dangling_link() {
        let temp = TempDir::new().unwrap();
        let link = abs(&temp.path().join("hooks.d"));
        std::os::unix::fs::symlink(temp.path().join("gone"), link.as_path()).unwrap();
        assert!(!link.as_path().exists());

        force_symlink(&RealSystem, temp.path(), &link).unwrap();

        assert_eq!(fs::read_link(link.as_path()).unwrap(), temp.path());
    }

    #[test]
    fn test_is_executable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("10-setup.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        assert!(!RealSystem.is_executable_file(&abs(&script)));

        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(RealSystem.is_executable_file(&abs(&script)));

        // Directories never qualify, even with the execute bit
        assert!(!RealSystem.is_executable_file(&abs(temp.path())));
    }

    #[test]
    fn test_read_dir_is_one_level() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.sh"), "").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/b.sh"), "").unwrap();

        let mut names: Vec<String> = RealSystem
            .read_dir(&abs(temp.path()))
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.sh", "nested"]);
    }

    #[test]
    fn test_recording_system_records_only_writes() {
        let temp = TempDir::new().unwrap();
        let recording = RecordingSystem::new(&RealSystem);
        let dir = abs(&temp.path().join("hooks"));

        assert!(!recording.exists(&dir));
        recording.create_dir_all(&dir).unwrap();
        let _ = recording.canonicalize(&dir).unwrap();

        assert_eq!(
            recording.operations(),
            vec![Operation::CreateDir { path: dir.clone() }]
        );
        assert!(dir.as_path().is_dir());
    }
}
