//! Git hook installation
//!
//! Two things are installed:
//!
//! - Dispatch shims: for every configured hook name with a shim in the
//!   repository, `<common-dir>/hooks/<name>` becomes a symlink to that shim
//! - The active binding: `<common-dir>/hooks.d` becomes a symlink to the
//!   repository's hook source directory, where the shims look for the real
//!   hook scripts
//!
//! ## Module Organization
//!
//! - `linker`: shim linking and binding activation

pub mod linker;

pub use linker::{HookLinker, LinkReport};
