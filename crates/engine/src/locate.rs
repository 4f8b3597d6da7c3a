//! Self-location
//!
//! Finds the canonical directory of the running program, following any chain
//! of symbolic links it was invoked through. Relative link targets resolve
//! against the directory holding the link, not the current directory.

use crate::system::System;
use crate::{AbsPath, Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Maximum number of symlinks followed before giving up
///
/// Matches the kernel's `ELOOP` limit on Linux.
pub const MAX_LINK_HOPS: usize = 40;

/// Follow `path` through symbolic links until it names something that is not a link
///
/// # Errors
///
/// Returns `Error::SymlinkLoop` if more than [`MAX_LINK_HOPS`] links are
/// traversed, or an IO error if a link cannot be read.
pub fn resolve_link_chain(system: &dyn System, path: &AbsPath) -> Result<AbsPath> {
    let mut current = path.clone();
    let mut hops = 0;

    while system.is_symlink(&current) {
        if hops == MAX_LINK_HOPS {
            return Err(Error::SymlinkLoop {
                path: path.as_path().to_path_buf(),
                hops,
            });
        }

        let target = system.read_link(&current)?;
        let link_dir = current.parent().unwrap_or_else(|| current.clone());
        tracing::debug!(link = %current, target = %target.display(), "Following symlink");
        current = AbsPath::resolve_against(&link_dir, &target);
        hops += 1;
    }

    Ok(current)
}

/// Resolve the canonical directory containing the file `invocation` ultimately names
pub fn resolve_program_dir(system: &dyn System, invocation: &AbsPath) -> Result<AbsPath> {
    let program = resolve_link_chain(system, invocation)?;
    let dir = program
        .parent()
        .ok_or_else(|| Error::Locate(format!("{program} has no parent directory")))?;
    system.canonicalize(&dir)
}

/// Determine the absolute path the program was invoked as
///
/// `argv[0]` is used when it names a path. A bare program name is looked up on
/// `PATH`; if that fails too, the executable path reported by the OS is used.
pub fn invocation_path() -> Result<AbsPath> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::Locate(format!("cannot read current directory: {e}")))?;

    invocation_from(
        std::env::args_os().next(),
        &cwd,
        std::env::var_os("PATH"),
        current_exe,
    )
}

fn current_exe() -> Result<PathBuf> {
    std::env::current_exe().map_err(|e| Error::Locate(format!("cannot query executable: {e}")))
}

/// [`invocation_path`] with every input made explicit
pub fn invocation_from(
    arg0: Option<OsString>,
    cwd: &Path,
    search_path: Option<OsString>,
    fallback: impl FnOnce() -> Result<PathBuf>,
) -> Result<AbsPath> {
    let path = match arg0 {
        Some(arg0) if Path::new(&arg0).components().count() > 1 => cwd.join(arg0),
        Some(arg0) if !arg0.is_empty() => match which::which_in(&arg0, search_path, cwd) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(program = ?arg0, error = %e, "Program name not on PATH");
                fallback()?
            }
        },
        _ => fallback()?,
    };

    AbsPath::new(cwd.join(path))
}

/// Change the process working directory to `dir`
pub fn enter(dir: &AbsPath) -> Result<()> {
    std::env::set_current_dir(dir.as_path()).map_err(|source| Error::EnterDirectory {
        path: dir.as_path().to_path_buf(),
        source,
    })?;
    tracing::debug!(dir = %dir, "Entered program directory");
    Ok(())
}
