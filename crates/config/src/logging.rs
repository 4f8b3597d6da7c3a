//! Logging configuration for the repoboot CLI
//!
//! Progress lines go to stdout through a compact `tracing` layer; an optional
//! log file receives everything at debug level.

use crate::{Error, Result};
use std::path::Path;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events reach the terminal
const TARGETS: &[&str] = &["repoboot", "repoboot_engine", "repoboot_config"];

/// Build the terminal filter, honouring `RUST_LOG` when set
fn stdout_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(directives)
    })
}

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging and timestamps on the terminal
/// * `log_file` - Optional path to append debug logs to
///
/// # Examples
/// ```ignore
/// // Progress lines only
/// init(false, None)?;
///
/// // Debug output plus a persistent log
/// init(true, Some(Path::new("repoboot.log")))?;
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    // The two stdout layers differ in type, so exactly one of them is Some
    let timed = verbose.then(|| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .compact()
            .with_ansi(true)
            .with_filter(stdout_filter(true))
    });
    let untimed = (!verbose).then(|| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .without_time()
            .compact()
            .with_ansi(true)
            .with_filter(stdout_filter(false))
    });

    let file_layer = match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .map_err(|e| Error::path_io("Failed to open log file", log_path, e))?;

            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(timed)
        .with(untimed)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Message(format!("Failed to initialize logging: {e}")))
}
