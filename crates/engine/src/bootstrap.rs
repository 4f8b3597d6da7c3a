//! Bootstrap orchestration
//!
//! Runs every step in a fixed order and stops at the first failure. Each error
//! is tagged with the [`Step`] it came from. Nothing is rolled back: every step
//! is idempotent, so the fix for a failed run is to run again.

use crate::extensions::{DuctLauncher, ExtensionLoader, ExtensionRunner};
use crate::git::Workspace;
use crate::gitconfig::{self, Change};
use crate::hooks::{HookLinker, LinkReport};
use crate::system::{RealSystem, System};
use crate::{AbsPath, ConfigStore, Result, ScriptLauncher, Step, locate, requirements};
use repoboot_config::Settings;
use std::ffi::OsString;

/// Where the program lives and which repository it belongs to
#[derive(Debug, Clone)]
pub struct Located {
    /// Canonical directory containing the running program
    pub anchor: AbsPath,
    /// Repository discovered from the anchor
    pub workspace: Workspace,
}

/// Resolve the program directory, enter it, and discover its repository
///
/// Changes the process working directory.
pub fn locate_workspace(system: &dyn System) -> Result<Located> {
    let anchor = locate::invocation_path()
        .and_then(|invocation| locate::resolve_program_dir(system, &invocation))
        .and_then(|anchor| locate::enter(&anchor).map(|()| anchor))
        .map_err(|e| e.in_step(Step::Locate))?;

    let workspace = Workspace::discover(&anchor).map_err(|e| e.in_step(Step::Discover))?;

    Ok(Located { anchor, workspace })
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// `pull.rebase`
    pub pull_rebase: Change,
    /// `blame.ignoreRevisionsFile`
    pub blame_ignore: Change,
    /// Pull request refspec in the remote's fetch list
    pub pull_request_fetch: Change,
    /// Hook shims and binding
    pub hooks: LinkReport,
    /// Extension scripts that ran, in order
    pub extensions: Vec<String>,
}

/// A configured bootstrap run
pub struct Bootstrap<'a> {
    settings: &'a Settings,
    workspace: &'a Workspace,
    config: &'a dyn ConfigStore,
    system: &'a dyn System,
    launcher: &'a dyn ScriptLauncher,
    search_path: Option<OsString>,
}

impl<'a> Bootstrap<'a> {
    /// Create a run against the real filesystem and process launcher
    pub fn new(
        settings: &'a Settings,
        workspace: &'a Workspace,
        config: &'a dyn ConfigStore,
    ) -> Self {
        Self {
            settings,
            workspace,
            config,
            system: &RealSystem,
            launcher: &DuctLauncher,
            search_path: None,
        }
    }

    /// Use a different filesystem backend
    #[must_use]
    pub fn system(mut self, system: &'a dyn System) -> Self {
        self.system = system;
        self
    }

    /// Use a different process launcher
    #[must_use]
    pub fn launcher(mut self, launcher: &'a dyn ScriptLauncher) -> Self {
        self.launcher = launcher;
        self
    }

    /// Resolve requirements against `path` instead of the process `PATH`
    #[must_use]
    pub fn search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Run every step
    ///
    /// # Errors
    ///
    /// Returns the first failure wrapped in `Error::Step`
    #[tracing::instrument(skip_all, fields(root = %self.workspace.root))]
    pub fn run(&self) -> Result<BootstrapReport> {
        self.check_requirements()
            .map_err(|e| e.in_step(Step::Requirements))?;

        let git = &self.settings.git;
        let pull_rebase = gitconfig::apply_pull_rebase(self.config, git)
            .map_err(|e| e.in_step(Step::PullRebase))?;
        let blame_ignore = gitconfig::apply_blame_ignore(self.config, git)
            .map_err(|e| e.in_step(Step::BlameIgnore))?;
        let pull_request_fetch = gitconfig::ensure_pull_request_fetch(self.config, git)
            .map_err(|e| e.in_step(Step::PullRequestFetch))?;

        let hooks = HookLinker::new(self.system, self.workspace, &self.settings.hooks);
        let linked = hooks.link_shims().map_err(|e| e.in_step(Step::LinkHooks))?;
        let activation = hooks
            .activate()
            .map_err(|e| e.in_step(Step::ActivateHooks))?;

        let extensions = self
            .run_extensions()
            .map_err(|e| e.in_step(Step::Extensions))?;

        Ok(BootstrapReport {
            pull_rebase,
            blame_ignore,
            pull_request_fetch,
            hooks: LinkReport { linked, activation },
            extensions,
        })
    }

    fn check_requirements(&self) -> Result<()> {
        let required = &self.settings.requirements;
        tracing::debug!(?required, "Checking requirements");
        let cwd = self.workspace.root.as_path();
        match &self.search_path {
            Some(path) => requirements::check_in(required, Some(path.clone()), cwd),
            None => requirements::check(required),
        }
    }

    fn run_extensions(&self) -> Result<Vec<String>> {
        let extensions = &self.settings.extensions;
        let dir = self.workspace.resolve(&extensions.dir);
        let loader = ExtensionLoader::new(dir, &extensions.suffix);
        let scripts = loader.discover(self.system)?;

        ExtensionRunner::new(self.launcher, self.workspace).run(&scripts)
    }
}
