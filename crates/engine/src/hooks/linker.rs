//! Hook shim linking and binding activation

use crate::git::Workspace;
use crate::gitconfig::Change;
use crate::system::{System, force_symlink};
use crate::{AbsPath, Error, Result};
use repoboot_config::{HookSettings, is_file_name};

/// What a [`HookLinker::run`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Hook names that received a shim link, in configured order
    pub linked: Vec<String>,
    /// Whether the active binding had to be (re)created
    pub activation: Change,
}

/// Installs hook shims and binds the active hooks directory
pub struct HookLinker<'a> {
    system: &'a dyn System,
    names: &'a [String],
    shim_dir: AbsPath,
    source_dir: AbsPath,
    private_dir: AbsPath,
    active_link: AbsPath,
}

impl<'a> HookLinker<'a> {
    /// Create a linker for `workspace` using the paths in `settings`
    pub fn new(
        system: &'a dyn System,
        workspace: &Workspace,
        settings: &'a HookSettings,
    ) -> Self {
        Self {
            system,
            names: &settings.names,
            shim_dir: workspace.resolve(&settings.shim_dir),
            source_dir: workspace.resolve(&settings.source_dir),
            private_dir: workspace.private_hooks_dir(),
            active_link: workspace.common_dir.join(&settings.active_link),
        }
    }

    /// Link shims, then activate the binding
    #[tracing::instrument(skip(self), fields(shim_dir = %self.shim_dir))]
    pub fn run(&self) -> Result<LinkReport> {
        let linked = self.link_shims()?;
        let activation = self.activate()?;
        Ok(LinkReport { linked, activation })
    }

    /// Point `<private hooks dir>/<name>` at each shim that exists
    ///
    /// Existing files or links at those locations are replaced. Names without
    /// a shim are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::HookLink` naming the first hook that could not be linked.
    /// A name that is not a plain file name fails before anything is linked.
    pub fn link_shims(&self) -> Result<Vec<String>> {
        if let Some(name) = self.names.iter().find(|name| !is_file_name(name)) {
            return Err(Error::HookLink {
                hook: name.clone(),
                source: Box::new(Error::Message(format!("invalid hook name '{name}'"))),
            });
        }

        let mut linked = Vec::new();

        for name in self.names {
            let shim = self.shim_dir.join(name);
            if !self.system.exists(&shim) {
                continue;
            }

            self.link_one(name, &shim).map_err(|e| Error::HookLink {
                hook: name.clone(),
                source: Box::new(e),
            })?;
            linked.push(name.clone());
        }

        if linked.is_empty() {
            tracing::debug!("No hook shims found");
        } else {
            tracing::info!(count = linked.len(), "Linked hook shims");
        }
        Ok(linked)
    }

    fn link_one(&self, name: &str, shim: &AbsPath) -> Result<()> {
        let target = self.system.canonicalize(shim)?;

        if !self.system.exists(&self.private_dir) {
            self.system.create_dir_all(&self.private_dir)?;
        }

        let link = self.private_dir.join(name);
        force_symlink(self.system, target.as_path(), &link)?;
        tracing::debug!(hook = name, target = %target, "Linked shim");
        Ok(())
    }

    /// Bind the active hooks location to the hook source directory
    ///
    /// Nothing is written when the binding already resolves to the source
    /// directory. Anything else at that location, including a real directory,
    /// is replaced.
    pub fn activate(&self) -> Result<Change> {
        if !self.system.exists(&self.source_dir) {
            return Err(Error::HookSourceMissing {
                path: self.source_dir.as_path().to_path_buf(),
            });
        }
        let source = self.system.canonicalize(&self.source_dir)?;

        if self.is_bound_to(&source) {
            tracing::debug!(link = %self.active_link, "Hook binding already correct");
            return Ok(Change::Unchanged);
        }

        force_symlink(self.system, source.as_path(), &self.active_link).map_err(|e| {
            Error::HookActivation {
                path: self.active_link.as_path().to_path_buf(),
                source: Box::new(e),
            }
        })?;
        tracing::info!(link = %self.active_link, target = %source, "Activated repository hooks");
        Ok(Change::Applied)
    }

    fn is_bound_to(&self, source: &AbsPath) -> bool {
        if !self.system.is_symlink(&self.active_link) {
            return false;
        }
        self.system
            .canonicalize(&self.active_link)
            .is_ok_and(|current| &current == source)
    }
}
