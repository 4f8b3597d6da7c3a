//! Repoboot CLI library
//!
//! This library contains the CLI logic for repoboot, making it reusable
//! for testing and integration with other tools.

pub mod error;
pub mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use repoboot_config::Settings;
use repoboot_engine::{Bootstrap, GitCliConfig, RealSystem, Step, locate_workspace};
use std::path::PathBuf;

use error::CommandError;
use ui::StatusIcon;

/// Repoboot - bootstrap a freshly cloned repository
#[derive(Parser, Debug)]
#[command(name = "repoboot")]
#[command(about = "Bootstrap a freshly cloned git repository")]
#[command(version)]
#[command(long_about = "Bootstrap a freshly cloned git repository

Run it from anywhere; it finds the repository it lives in. Safe to run again
at any time.

Steps:
  • Check that required tools are installed
  • Configure pull.rebase, blame.ignoreRevisionsFile and pull request fetching
  • Link hook dispatch shims and activate the repository's hooks directory
  • Run the repository's extension scripts in name order

Defaults can be changed with a .repoboot.toml at the repository root.")]
pub struct Cli {
    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "REPOBOOT_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Run the bootstrap
///
/// # Errors
///
/// Returns an error for any failed step; the caller exits unsuccessfully.
pub fn run(cli: Cli) -> Result<()> {
    repoboot_config::logging::init(cli.verbose, cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        "Starting repoboot"
    );

    let system = RealSystem;
    let located = locate_workspace(&system).map_err(CommandError::from)?;
    let workspace = &located.workspace;
    tracing::debug!(anchor = %located.anchor, root = %workspace.root, "Located repository");

    let settings = Settings::load(workspace.root.as_path())
        .map_err(|e| CommandError::from(e.in_step(Step::Settings)))?;
    let config = GitCliConfig::new(&workspace.root);

    println!(
        "{} {}",
        StatusIcon::Running.get(),
        format!("Bootstrapping {}", workspace.root).bold()
    );

    let report = Bootstrap::new(&settings, workspace, &config)
        .system(&system)
        .run()
        .map_err(|source| CommandError::Bootstrap {
            root: workspace.root.as_path().to_path_buf(),
            source,
        })?;

    ui::report::print(&report);
    Ok(())
}
