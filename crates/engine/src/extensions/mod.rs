//! Extension scripts
//!
//! A repository can ship setup steps of its own as executable scripts in a
//! conventional directory. They are discovered on every run and executed in
//! file name order, stopping at the first failure.
//!
//! ## Module Organization
//!
//! - `loader`: discovery and ordering
//! - `runner`: process launching and fail-fast execution

pub mod loader;
pub mod runner;

pub use loader::{ExtensionLoader, ExtensionScript};
pub use runner::{
    DuctLauncher, ENV_GIT_DIR, ENV_ROOT, ExtensionRunner, Invocation, RecordingLauncher,
};
