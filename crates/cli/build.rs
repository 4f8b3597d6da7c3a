//! Build script for repoboot-cli.
//!
//! Generates build-time metadata using vergen:
//! - Build information (timestamp, target, etc.)
//! - Rustc version information
//! - Git repository information (commit SHA, branch, etc.), reported by
//!   `repoboot --verbose`

use vergen_git2::{Emitter, Git2Builder};

fn main() -> anyhow::Result<()> {
    let build = vergen::BuildBuilder::all_build()?;
    let rustc = vergen::RustcBuilder::all_rustc()?;

    vergen::Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&rustc)?
        .emit()?;

    let git2 = Git2Builder::all_git()?;
    Emitter::default().add_instructions(&git2)?.emit()?;

    Ok(())
}
