//! Extension execution
//!
//! Scripts run one at a time with their output passed straight through to the
//! terminal. The first failure stops the run.

use super::loader::ExtensionScript;
use crate::git::Workspace;
use crate::{AbsPath, Error, Result, ScriptLauncher};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environment variable holding the work tree root
pub const ENV_ROOT: &str = "REPOBOOT_ROOT";

/// Environment variable holding the git common directory
pub const ENV_GIT_DIR: &str = "REPOBOOT_GIT_DIR";

fn script_name(script: &Path) -> String {
    script.file_name().map_or_else(
        || script.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// [`ScriptLauncher`] that executes scripts as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct DuctLauncher;

impl ScriptLauncher for DuctLauncher {
    #[tracing::instrument(skip(self, env), fields(script = %script.display()))]
    fn launch(
        &self,
        script: &Path,
        working_dir: &Path,
        env: &IndexMap<String, String>,
    ) -> Result<()> {
        // Inherits the parent environment and stdio
        let mut expression = duct::cmd!(script).dir(working_dir).unchecked();
        for (key, value) in env {
            expression = expression.env(key, value);
        }

        let output = expression.run().map_err(|source| Error::ExtensionLaunch {
            script: script_name(script),
            source,
        })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::ExtensionFailed {
                script: script_name(script),
                status: output.status.to_string(),
            })
        }
    }
}

/// One call recorded by a [`RecordingLauncher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Script that was launched
    pub script: PathBuf,
    /// Working directory it was given
    pub working_dir: PathBuf,
    /// Extra environment it was given
    pub env: IndexMap<String, String>,
}

/// [`ScriptLauncher`] that records calls instead of running anything
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    invocations: RefCell<Vec<Invocation>>,
    failing: HashSet<String>,
}

impl RecordingLauncher {
    /// Create a launcher where every script succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the script with file name `name` exit unsuccessfully
    #[must_use]
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Every recorded call, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// File names of every launched script, in order
    pub fn launched(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|i| script_name(&i.script))
            .collect()
    }
}

impl ScriptLauncher for RecordingLauncher {
    fn launch(
        &self,
        script: &Path,
        working_dir: &Path,
        env: &IndexMap<String, String>,
    ) -> Result<()> {
        self.invocations.borrow_mut().push(Invocation {
            script: script.to_path_buf(),
            working_dir: working_dir.to_path_buf(),
            env: env.clone(),
        });

        let name = script_name(script);
        if self.failing.contains(&name) {
            return Err(Error::ExtensionFailed {
                script: name,
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Runs discovered extension scripts in order
pub struct ExtensionRunner<'a> {
    launcher: &'a dyn ScriptLauncher,
    working_dir: AbsPath,
    env: IndexMap<String, String>,
}

impl<'a> ExtensionRunner<'a> {
    /// Create a runner for `workspace`
    ///
    /// Scripts run in the work tree root with [`ENV_ROOT`] and [`ENV_GIT_DIR`]
    /// added to the inherited environment.
    pub fn new(launcher: &'a dyn ScriptLauncher, workspace: &Workspace) -> Self {
        let mut env = IndexMap::new();
        env.insert(ENV_ROOT.to_string(), workspace.root.to_string());
        env.insert(ENV_GIT_DIR.to_string(), workspace.common_dir.to_string());

        Self {
            launcher,
            working_dir: workspace.root.clone(),
            env,
        }
    }

    /// Add an environment variable for every script
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Execute `scripts` in the given order, stopping at the first failure
    ///
    /// Returns the names of the scripts that ran.
    ///
    /// # Errors
    ///
    /// Returns the first launch or exit failure; later scripts are not started
    pub fn run(&self, scripts: &[ExtensionScript]) -> Result<Vec<String>> {
        let mut completed = Vec::with_capacity(scripts.len());

        for script in scripts {
            tracing::info!(script = %script.name, "Running extension");
            let path = script.path.as_path();
            self.launcher
                .launch(path, self.working_dir.as_path(), &self.env)?;
            completed.push(script.name.clone());
        }

        Ok(completed)
    }
}
