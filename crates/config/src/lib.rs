//! Configuration management for repoboot
//!
//! This crate handles:
//! - Bootstrap settings (built-in defaults, optional `.repoboot.toml`)
//! - Logging initialization

pub mod logging;
pub mod settings;

// Re-export error types from core
pub use repoboot_core::{Error, Result};

// Re-export main types
pub use settings::{
    DEFAULT_HOOK_NAMES, ExtensionSettings, GitSettings, HookSettings, SETTINGS_FILE, Settings,
    is_file_name,
};
