//! Core types and utilities for repoboot
//!
//! This is the foundation crate (Layer 0) that all other repoboot crates depend on.
//! It provides:
//! - The absolute path type (`AbsPath`)
//! - Base error types and the bootstrap `Step` names they refer to
//! - Behavioral traits for the external collaborators (`ConfigStore`, `ScriptLauncher`)
//!
//! This crate has no dependencies on other repoboot crates.

pub mod error;
pub mod path;
pub mod step;
pub mod traits;

pub use error::{Error, Result};
pub use path::AbsPath;
pub use step::Step;
pub use traits::{ConfigStore, ScriptLauncher};
