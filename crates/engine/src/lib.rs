//! # Repoboot Engine
//!
//! The bootstrap procedure for a freshly cloned repository.
//!
//! This crate provides every bootstrap component and the orchestrator that
//! sequences them:
//!
//! - **Self-location**: Resolve the program's directory through symlink chains
//! - **Requirements**: Verify external tools before changing anything
//! - **Git configuration**: Idempotent `git config` writes
//! - **Hooks**: Dispatch shim links and the active hooks directory binding
//! - **Extensions**: Ordered, fail-fast execution of repository setup scripts
//! - **System Abstraction**: Filesystem operations abstracted for testing

pub mod bootstrap;
pub mod extensions;
pub mod git;
pub mod gitconfig;
pub mod hooks;
pub mod locate;
pub mod requirements;
pub mod system;

// Re-export core types
pub use repoboot_core::{AbsPath, ConfigStore, Error, Result, ScriptLauncher, Step};

// Re-export commonly used types
pub use bootstrap::{Bootstrap, BootstrapReport, Located, locate_workspace};
pub use git::{GitCliConfig, MemoryConfig, Workspace};
pub use gitconfig::Change;
pub use hooks::{HookLinker, LinkReport};
pub use system::{RealSystem, RecordingSystem, System};
