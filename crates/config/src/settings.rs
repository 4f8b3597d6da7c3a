//! Bootstrap settings
//!
//! Every value the bootstrap writes or looks for has a built-in default. A
//! repository can override any of them with a `.repoboot.toml` at its work
//! tree root:
//!
//! ```toml
//! requirements = ["git", "sh"]
//!
//! [git]
//! remote = "upstream"
//!
//! [hooks]
//! names = ["pre-commit", "pre-push"]
//!
//! [extensions]
//! dir = "scripts/setup.d"
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the optional settings file at the work tree root
pub const SETTINGS_FILE: &str = ".repoboot.toml";

/// Every client-side hook event documented in githooks(5)
pub const DEFAULT_HOOK_NAMES: &[&str] = &[
    "applypatch-msg",
    "pre-applypatch",
    "post-applypatch",
    "pre-commit",
    "pre-merge-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-rebase",
    "post-checkout",
    "post-merge",
    "pre-push",
    "pre-receive",
    "update",
    "proc-receive",
    "post-receive",
    "post-update",
    "reference-transaction",
    "push-to-checkout",
    "pre-auto-gc",
    "post-rewrite",
    "sendemail-validate",
    "fsmonitor-watchman",
    "p4-changelist",
    "p4-prepare-changelist",
    "p4-post-changelist",
    "p4-pre-submit",
    "post-index-change",
];

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Executables that must be on `PATH` before anything is changed
    pub requirements: Vec<String>,

    /// Git configuration values
    pub git: GitSettings,

    /// Hook dispatch installation
    pub hooks: HookSettings,

    /// Extension scripts
    pub extensions: ExtensionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            requirements: vec!["git".to_string()],
            git: GitSettings::default(),
            hooks: HookSettings::default(),
            extensions: ExtensionSettings::default(),
        }
    }
}

/// `[git]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Remote whose fetch list receives the pull request refspec
    pub remote: String,

    /// Value written to `pull.rebase`
    #[serde(rename = "pullRebase")]
    pub pull_rebase: String,

    /// Value written to `blame.ignoreRevisionsFile`
    #[serde(rename = "blameIgnoreFile")]
    pub blame_ignore_file: String,

    /// Refspec ensured in `remote.<remote>.fetch`; derived from `remote` when unset
    #[serde(rename = "pullRequestRefspec")]
    pub pull_request_refspec: Option<String>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            pull_rebase: "true".to_string(),
            blame_ignore_file: ".git-blame-ignore-revs".to_string(),
            pull_request_refspec: None,
        }
    }
}

impl GitSettings {
    /// The multi-valued key holding the remote's fetch refspecs
    pub fn fetch_key(&self) -> String {
        format!("remote.{}.fetch", self.remote)
    }

    /// The refspec that makes `git fetch` download pull request heads
    ///
    /// # Examples
    ///
    /// ```
    /// use repoboot_config::GitSettings;
    ///
    /// let git = GitSettings::default();
    /// assert_eq!(
    ///     git.pull_request_refspec(),
    ///     "+refs/pull/*/head:refs/remotes/origin/pr/*"
    /// );
    /// ```
    pub fn pull_request_refspec(&self) -> String {
        self.pull_request_refspec
            .clone()
            .unwrap_or_else(|| format!("+refs/pull/*/head:refs/remotes/{}/pr/*", self.remote))
    }
}

/// `[hooks]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookSettings {
    /// Directory of dispatch shims, one file per hook name
    #[serde(rename = "shimDir")]
    pub shim_dir: PathBuf,

    /// Directory bound as the active hooks directory
    #[serde(rename = "sourceDir")]
    pub source_dir: PathBuf,

    /// Location of the binding symlink, relative to the git common directory
    #[serde(rename = "activeLink")]
    pub active_link: PathBuf,

    /// Hook events that get a shim link when a shim exists
    pub names: Vec<String>,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            shim_dir: PathBuf::from("tools/git-hooks"),
            source_dir: PathBuf::from("tools/hooks.d"),
            active_link: PathBuf::from("hooks.d"),
            names: DEFAULT_HOOK_NAMES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// `[extensions]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionSettings {
    /// Directory scanned (one level) for extension scripts
    pub dir: PathBuf,

    /// File name suffix a script must carry
    pub suffix: String,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tools/bootstrap.d"),
            suffix: ".sh".to_string(),
        }
    }
}

impl Settings {
    /// Load settings for the repository whose work tree is `work_tree`
    ///
    /// Returns the defaults when `.repoboot.toml` does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid TOML, contains
    /// unknown keys, or fails validation
    pub fn load(work_tree: &Path) -> Result<Self> {
        let path = work_tree.join(SETTINGS_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::path_io("Failed to read settings file", &path, e))?;
        let settings = Self::from_toml_str(&content).map_err(|message| Error::Settings {
            path: path.clone(),
            message,
        })?;

        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Parse and validate settings from a TOML string
    ///
    /// The error is a plain message; [`Settings::load`] attaches the file path.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        let settings: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.git.remote.is_empty() {
            return Err("git.remote must not be empty".to_string());
        }

        if let Some(name) = self.hooks.names.iter().find(|name| !is_file_name(name)) {
            return Err(format!("invalid hook name '{name}'"));
        }

        if self.requirements.iter().any(String::is_empty) {
            return Err("requirements must not contain empty names".to_string());
        }

        Ok(())
    }
}

/// Whether `name` is exactly one ordinary path component
///
/// Rejects empty names, `.`, `..` and anything with a separator.
pub fn is_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    let first = components.next();
    matches!(first, Some(Component::Normal(_))) && components.next().is_none()
}
