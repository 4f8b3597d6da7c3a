//! Core behavioral traits for repoboot components
//!
//! The bootstrap mutates state it does not own: the version-control client's
//! configuration store and child processes. These traits are the narrow
//! interfaces the engine talks to, so tests can substitute in-memory fakes.
//! The filesystem seam lives next to its implementations in
//! `repoboot_engine::system`.

use crate::Result;
use indexmap::IndexMap;
use std::path::Path;

/// Version-control configuration store
///
/// Keys use the dotted `section.name` form (`pull.rebase`,
/// `remote.origin.fetch`). All methods take `&self`; implementations that keep
/// state in memory use interior mutability.
///
/// # Examples
///
/// ```ignore
/// fn rebase_enabled(store: &dyn ConfigStore) -> Result<bool> {
///     Ok(store.get("pull.rebase")?.as_deref() == Some("true"))
/// }
/// ```
pub trait ConfigStore {
    /// Read a single-valued key; `None` when unset
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Read every value of a multi-valued key, in file order
    fn get_all(&self, key: &str) -> Result<Vec<String>>;

    /// Replace the value of a single-valued key
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Append one more value to a multi-valued key
    fn add(&self, key: &str, value: &str) -> Result<()>;
}

/// Process launcher for extension scripts
pub trait ScriptLauncher {
    /// Execute `script` and wait for it
    ///
    /// # Arguments
    ///
    /// * `script` - Absolute path of the executable
    /// * `working_dir` - Directory the child runs in
    /// * `env` - Variables added on top of the inherited environment
    ///
    /// # Errors
    ///
    /// `Error::ExtensionLaunch` if the process cannot be started,
    /// `Error::ExtensionFailed` if it exits unsuccessfully.
    fn launch(
        &self,
        script: &Path,
        working_dir: &Path,
        env: &IndexMap<String, String>,
    ) -> Result<()>;
}
