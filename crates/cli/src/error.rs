//! Error types for the CLI
//!
//! Library errors already name the step that failed. This layer adds which
//! repository was being bootstrapped.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the bootstrap command
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// The bootstrap procedure failed part-way
    #[error("Bootstrap of {} did not complete", root.display())]
    Bootstrap {
        /// Work tree root of the repository
        root: PathBuf,
        /// The step failure
        #[source]
        source: repoboot_core::Error,
    },

    /// Failure before a repository was known
    #[error(transparent)]
    Core(#[from] repoboot_core::Error),
}
