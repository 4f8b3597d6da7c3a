//! The installed binary run through a symlink, as a fresh clone would use it
//!
//! Skipped when `git` is not installed.

#![allow(clippy::unwrap_used, clippy::panic)]

use repoboot_engine::{AbsPath, ConfigStore, GitCliConfig};
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const REMOTE_URL: &str = "https://example.com/project.git";
const NOOP: &str = "#!/bin/sh\nexit 0\n";

fn write_executable(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Repository with the binary copied into `tools/`, plus a symlink to that
/// copy living outside the repository
struct Checkout {
    _repo: TempDir,
    _bin: TempDir,
    elsewhere: TempDir,
    root: PathBuf,
    link: PathBuf,
}

impl Checkout {
    fn new() -> Self {
        let repo = TempDir::new().unwrap();
        let root = fs::canonicalize(repo.path()).unwrap();
        let git = git2::Repository::init(&root).unwrap();
        git.remote("origin", REMOTE_URL).unwrap();

        write_executable(&root.join("tools/git-hooks/pre-commit"), NOOP);
        fs::create_dir_all(root.join("tools/hooks.d")).unwrap();
        let scripts = root.join("tools/bootstrap.d");
        write_executable(&scripts.join("10-ok.sh"), "#!/bin/sh\ntouch ok.ran\n");

        let installed = root.join("tools/repoboot");
        fs::copy(env!("CARGO_BIN_EXE_repoboot"), &installed).unwrap();

        let bin = TempDir::new().unwrap();
        let link = bin.path().join("repoboot");
        symlink(&installed, &link).unwrap();

        Self {
            _repo: repo,
            _bin: bin,
            elsewhere: TempDir::new().unwrap(),
            root,
            link,
        }
    }

    fn run(&self) -> Output {
        Command::new(&self.link)
            .current_dir(self.elsewhere.path())
            .env_remove("REPOBOOT_LOG_FILE")
            .output()
            .unwrap()
    }
}

/// Stderr with only ASCII letters and digits kept, so wrapped lines still match
fn squashed_stderr(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr.chars().filter(char::is_ascii_alphanumeric).collect()
}

#[test]
fn test_success_exits_zero() {
    if which::which("git").is_err() {
        return;
    }
    let checkout = Checkout::new();

    let output = checkout.run();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0), "{stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bootstrap complete"), "{stdout}");

    let root = AbsPath::new(checkout.root.clone()).unwrap();
    let config = GitCliConfig::new(&root);
    assert_eq!(config.get("pull.rebase").unwrap().as_deref(), Some("true"));
    assert!(checkout.root.join(".git/hooks.d").is_symlink());
    assert!(checkout.root.join("ok.ran").exists());
}

#[test]
fn test_failing_extension_exits_one() {
    if which::which("git").is_err() {
        return;
    }
    let checkout = Checkout::new();
    let scripts = checkout.root.join("tools/bootstrap.d");
    write_executable(&scripts.join("15-fail.sh"), "#!/bin/sh\nexit 1\n");
    let after = "#!/bin/sh\ntouch after.ran\n";
    write_executable(&scripts.join("20-after.sh"), after);

    let output = checkout.run();

    assert_eq!(output.status.code(), Some(1));
    let stderr = squashed_stderr(&output);
    assert!(stderr.contains("15failsh"), "{stderr}");
    assert!(checkout.root.join("ok.ran").exists());
    assert!(!checkout.root.join("after.ran").exists());
}
