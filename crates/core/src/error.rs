//! Base error types for repoboot
//!
//! Every failure in a bootstrap run is fatal. The variants below only exist so
//! that the final report can say precisely which sub-step went wrong.

use crate::step::Step;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Base error type shared by all repoboot crates
#[derive(Error, Debug)]
pub enum Error {
    /// IO error tied to a specific path
    #[error("{action} {}", path.display())]
    PathIo {
        /// What was being attempted, e.g. "Failed to read link"
        action: &'static str,
        /// The path involved
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path is not absolute
    #[error("Path must be absolute: {}", path.display())]
    PathNotAbsolute { path: PathBuf },

    /// The invocation path of the running program could not be determined
    #[error("Cannot determine the location of the running program: {0}")]
    Locate(String),

    /// A chain of symbolic links did not terminate within the hop limit
    #[error(
        "Too many levels of symbolic links starting at {} (gave up after {hops} hops)",
        path.display()
    )]
    SymlinkLoop { path: PathBuf, hops: usize },

    /// Could not change the working directory
    #[error("Cannot enter directory {}", path.display())]
    EnterDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One or more required executables are not on the search path
    #[error(
        "Missing required tools: {} (requirements: {})",
        missing.join(", "),
        required.join(", ")
    )]
    MissingRequirements {
        /// The full requirement set, in declaration order
        required: Vec<String>,
        /// The subset that could not be resolved
        missing: Vec<String>,
    },

    /// Repository discovery failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// Reading from the configuration store failed
    #[error("Failed to read git config '{key}': {message}")]
    ConfigRead { key: String, message: String },

    /// The configuration store rejected a write
    #[error("Failed to write git config '{key}': {message}")]
    ConfigWrite { key: String, message: String },

    /// Installing the link for a single hook failed
    #[error("Failed to link hook '{hook}'")]
    HookLink {
        hook: String,
        #[source]
        source: Box<Error>,
    },

    /// The repository's hook source directory does not exist
    #[error("Hook source directory not found: {}", path.display())]
    HookSourceMissing { path: PathBuf },

    /// Swapping the active hooks directory binding failed
    #[error("Failed to activate repository hooks at {}", path.display())]
    HookActivation {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// An extension script could not be started
    #[error("Failed to launch extension script '{script}'")]
    ExtensionLaunch {
        script: String,
        #[source]
        source: io::Error,
    },

    /// An extension script exited unsuccessfully
    #[error("Extension script '{script}' failed ({status})")]
    ExtensionFailed { script: String, status: String },

    /// Settings file could not be parsed
    #[error("Invalid settings in {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },

    /// A bootstrap step failed
    #[error("Failed to {step}")]
    Step {
        step: Step,
        #[source]
        source: Box<Error>,
    },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach the bootstrap step that was running when this error occurred
    #[must_use]
    pub fn in_step(self, step: Step) -> Self {
        Error::Step {
            step,
            source: Box::new(self),
        }
    }

    /// Build a path-scoped IO error
    pub fn path_io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::PathIo {
            action,
            path: path.into(),
            source,
        }
    }

    /// The step this error was raised in, if it has been attached
    pub fn step(&self) -> Option<Step> {
        match self {
            Error::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_missing_requirements_lists_both_sets() {
        let error = Error::MissingRequirements {
            required: vec!["git".to_string(), "ln".to_string()],
            missing: vec!["ln".to_string()],
        };

        let msg = error.to_string();
        assert!(msg.contains("Missing required tools: ln"));
        assert!(msg.contains("requirements: git, ln"));
    }

    #[test]
    fn test_in_step_wraps_source() {
        let inner = Error::ExtensionFailed {
            script: "10-tools.sh".to_string(),
            status: "exit status: 3".to_string(),
        };
        let error = inner.in_step(Step::Extensions);

        assert_eq!(error.step(), Some(Step::Extensions));
        assert_eq!(error.to_string(), "Failed to run extension scripts");
        let source = error.source().unwrap().to_string();
        assert!(source.contains("10-tools.sh"));
    }

    #[test]
    fn test_step_is_none_for_unwrapped_error() {
        let error = Error::Message("plain".to_string());
        assert!(error.step().is_none());
    }

    #[test]
    fn test_path_io_keeps_path_and_source() {
        let error = Error::path_io(
            "Failed to read link",
            "/repo/.git/hooks.d",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(error.to_string(), "Failed to read link /repo/.git/hooks.d");
        assert_eq!(error.source().unwrap().to_string(), "denied");
    }

    #[test]
    fn test_hook_link_names_hook() {
        let error = Error::HookLink {
            hook: "pre-push".to_string(),
            source: Box::new(Error::Message("boom".to_string())),
        };
        assert_eq!(error.to_string(), "Failed to link hook 'pre-push'");
    }
}
