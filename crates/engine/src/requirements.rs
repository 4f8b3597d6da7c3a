//! Requirement checking
//!
//! Every tool the bootstrap or its extension scripts depend on is checked up
//! front, so a missing tool aborts the run before anything has been changed.

use crate::{Error, Result};
use std::ffi::OsString;
use std::path::Path;

/// Verify that every name in `required` resolves on `PATH`
///
/// # Errors
///
/// Returns `Error::MissingRequirements` listing all unresolved names.
pub fn check(required: &[String]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| match which::which(name.as_str()) {
            Ok(path) => {
                tracing::debug!(tool = %name, path = %path.display(), "Found requirement");
                false
            }
            Err(_) => true,
        })
        .cloned()
        .collect();

    report(required, missing)
}

/// Like [`check`], but searching `search_path` instead of the process `PATH`
pub fn check_in(required: &[String], search_path: Option<OsString>, cwd: &Path) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| which::which_in(name.as_str(), search_path.clone(), cwd).is_err())
        .cloned()
        .collect();

    report(required, missing)
}

fn report(required: &[String], missing: Vec<String>) -> Result<()> {
    if missing.is_empty() {
        return Ok(());
    }

    Err(Error::MissingRequirements {
        required: required.to_vec(),
        missing,
    })
}
