//! Git repository access
//!
//! Two concerns live here:
//! - Locating the repository the program belongs to (git2 discovery)
//! - Reading and writing its configuration through a [`ConfigStore`]
//!
//! Configuration is written with the `git config` command rather than libgit2
//! so that the result is exactly what the user's own git would produce.

use crate::{AbsPath, ConfigStore, Error, Result};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// Helper function to convert git2 errors to repoboot errors
#[allow(clippy::needless_pass_by_value)]
fn git_err(start: &Path, e: git2::Error) -> Error {
    Error::Repository(format!(
        "cannot find a repository containing {}: {}",
        start.display(),
        e.message()
    ))
}

fn canonical(path: &Path) -> Result<AbsPath> {
    let resolved =
        std::fs::canonicalize(path).map_err(|e| Error::path_io("Failed to resolve", path, e))?;
    AbsPath::new(resolved)
}

/// The repository a bootstrap run operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Canonical work tree root
    pub root: AbsPath,
    /// Canonical git common directory (shared by all linked worktrees)
    pub common_dir: AbsPath,
}

impl Workspace {
    /// Discover the repository containing `start`
    ///
    /// Walks upward like `git rev-parse` does. Bare repositories are rejected
    /// because there is no work tree to take conventional directories from.
    pub fn discover(start: &AbsPath) -> Result<Self> {
        let repo =
            git2::Repository::discover(start.as_path()).map_err(|e| git_err(start.as_path(), e))?;

        let Some(workdir) = repo.workdir() else {
            let message = format!("{} is a bare repository", repo.path().display());
            return Err(Error::Repository(message));
        };

        let workspace = Self {
            root: canonical(workdir)?,
            common_dir: canonical(repo.commondir())?,
        };
        tracing::debug!(
            root = %workspace.root,
            common_dir = %workspace.common_dir,
            "Discovered repository"
        );
        Ok(workspace)
    }

    /// The directory git runs hooks from by default
    pub fn private_hooks_dir(&self) -> AbsPath {
        self.common_dir.join("hooks")
    }

    /// Resolve a work-tree-relative setting to an absolute path
    pub fn resolve(&self, relative: &Path) -> AbsPath {
        self.root.join(relative)
    }
}

/// [`ConfigStore`] backed by the `git config` command
///
/// Every read and write is scoped to the repository's local configuration.
#[derive(Debug, Clone)]
pub struct GitCliConfig {
    work_tree: PathBuf,
}

impl GitCliConfig {
    /// Operate on the repository whose work tree is `work_tree`
    pub fn new(work_tree: &AbsPath) -> Self {
        Self {
            work_tree: work_tree.as_path().to_path_buf(),
        }
    }

    fn git(&self, args: &[&str]) -> std::io::Result<std::process::Output> {
        tracing::trace!(args = ?args, "git config");
        duct::cmd("git", args)
            .dir(&self.work_tree)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
    }

    fn write(&self, key: &str, args: &[&str]) -> Result<()> {
        let output = self.git(args).map_err(|e| Error::ConfigWrite {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::ConfigWrite {
                key: key.to_string(),
                message: failure_message(&output),
            })
        }
    }

    fn read(&self, key: &str, flag: &str) -> Result<Option<String>> {
        let args = ["config", "--local", flag, key];
        let output = self.git(&args).map_err(|e| Error::ConfigRead {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        // Exit status 1 means the key is not set
        match output.status.code() {
            Some(0) => Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned())),
            Some(1) => Ok(None),
            _ => Err(Error::ConfigRead {
                key: key.to_string(),
                message: failure_message(&output),
            }),
        }
    }
}

fn failure_message(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("git config exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}

impl ConfigStore for GitCliConfig {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .read(key, "--get")?
            .map(|value| value.trim_end_matches('\n').to_string()))
    }

    fn get_all(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .read(key, "--get-all")?
            .map(|values| values.lines().map(str::to_string).collect())
            .unwrap_or_default())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write(key, &["config", "--local", key, value])
    }

    fn add(&self, key: &str, value: &str) -> Result<()> {
        self.write(key, &["config", "--local", "--add", key, value])
    }
}

/// In-memory [`ConfigStore`]
///
/// Keeps values in insertion order and counts writes, so tests can assert that
/// an idempotent step touched nothing.
#[derive(Debug, Default)]
pub struct MemoryConfig {
    values: RefCell<IndexMap<String, Vec<String>>>,
    failing_key: Option<String>,
    writes: Cell<usize>,
}

impl MemoryConfig {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write
    #[must_use]
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Make every write to `key` fail
    #[must_use]
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_key = Some(key.to_string());
        self
    }

    /// All values currently stored for `key`
    pub fn values(&self, key: &str) -> Vec<String> {
        self.values.borrow().get(key).cloned().unwrap_or_default()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        if self.failing_key.as_deref() == Some(key) {
            return Err(Error::ConfigWrite {
                key: key.to_string(),
                message: "could not lock config file".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigStore for MemoryConfig {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .borrow()
            .get(key)
            .and_then(|values| values.last().cloned()))
    }

    fn get_all(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.values(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), vec![value.to_string()]);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn add(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable(key)?;
        self.values
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    const HEADS: &str = "+refs/heads/*:refs/remotes/origin/*";
    const PULLS: &str = "+refs/pull/*/head:refs/remotes/origin/pr/*";

    fn abs(path: &Path) -> AbsPath {
        AbsPath::new(std::fs::canonicalize(path).unwrap()).unwrap()
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        git2::Repository::init(temp.path()).unwrap();
        let nested = temp.path().join("target/release");
        std::fs::create_dir_all(&nested).unwrap();

        let workspace = Workspace::discover(&abs(&nested)).unwrap();

        assert_eq!(workspace.root, abs(temp.path()));
        assert_eq!(workspace.common_dir, abs(&temp.path().join(".git")));
        assert_eq!(
            workspace.private_hooks_dir().as_path(),
            abs(&temp.path().join(".git")).as_path().join("hooks")
        );
    }

    #[test]
    fn test_discover_rejects_bare_repository() {
        let temp = TempDir::new().unwrap();
        git2::Repository::init_bare(temp.path()).unwrap();

        let err = Workspace::discover(&abs(temp.path())).unwrap_err();
        assert!(err.to_string().contains("bare"), "{err}");
    }

    #[test]
    fn test_memory_config_multi_valued() {
        let config = MemoryConfig::new().with_value("remote.origin.fetch", HEADS);

        config.add("remote.origin.fetch", PULLS).unwrap();

        let fetch = config.get_all("remote.origin.fetch").unwrap();
        assert_eq!(fetch, vec![HEADS, PULLS]);
        let last = config.get("remote.origin.fetch").unwrap();
        assert_eq!(last.as_deref(), Some(PULLS));
        assert_eq!(config.write_count(), 1);
    }

    #[test]
    fn test_memory_config_failing_key() {
        let config = MemoryConfig::new().failing_on("pull.rebase");

        let err = config.set("pull.rebase", "true").unwrap_err();
        assert!(matches!(err, Error::ConfigWrite { ref key, .. } if key == "pull.rebase"));
        assert_eq!(config.get("pull.rebase").unwrap(), None);
        assert_eq!(config.write_count(), 0);
    }

    #[test]
    fn test_git_cli_config_round_trip() {
        if which::which("git").is_err() {
            return;
        }
        let temp = TempDir::new().unwrap();
        git2::Repository::init(temp.path()).unwrap();
        let config = GitCliConfig::new(&abs(temp.path()));

        assert_eq!(config.get("pull.rebase").unwrap(), None);
        assert!(config.get_all("remote.origin.fetch").unwrap().is_empty());

        config.set("pull.rebase", "true").unwrap();
        config.add("remote.origin.fetch", HEADS).unwrap();
        config.add("remote.origin.fetch", PULLS).unwrap();

        assert_eq!(config.get("pull.rebase").unwrap().as_deref(), Some("true"));
        assert_eq!(config.get_all("remote.origin.fetch").unwrap().len(), 2);
    }
}
