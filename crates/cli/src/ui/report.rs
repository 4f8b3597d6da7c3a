//! Summary of a finished bootstrap run

use super::StatusIcon;
use owo_colors::OwoColorize;
use repoboot_engine::{BootstrapReport, Change};

/// One summary line: a marker and its message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Status marker
    pub icon: StatusIcon,
    /// Message text, uncolored
    pub text: String,
}

impl Line {
    fn new(icon: StatusIcon, text: impl Into<String>) -> Self {
        Self {
            icon,
            text: text.into(),
        }
    }
}

fn config_line(change: Change, what: &str) -> Line {
    match change {
        Change::Applied => Line::new(StatusIcon::Success, format!("Configured {what}")),
        Change::Unchanged => Line::new(StatusIcon::Info, format!("{what} already configured")),
    }
}

/// Build the summary lines for `report`
pub fn lines(report: &BootstrapReport) -> Vec<Line> {
    let mut lines = vec![
        config_line(report.pull_rebase, "pull.rebase"),
        config_line(report.blame_ignore, "blame.ignoreRevisionsFile"),
        config_line(report.pull_request_fetch, "pull request fetching"),
    ];

    let linked = &report.hooks.linked;
    lines.push(if linked.is_empty() {
        Line::new(StatusIcon::Info, "No hook shims to link")
    } else {
        let names = linked.join(", ");
        Line::new(
            StatusIcon::Hook,
            format!("Linked {} hook shim(s): {names}", linked.len()),
        )
    });

    lines.push(match report.hooks.activation {
        Change::Applied => Line::new(StatusIcon::Success, "Activated repository hooks"),
        Change::Unchanged => Line::new(StatusIcon::Info, "Repository hooks already active"),
    });

    lines.push(if report.extensions.is_empty() {
        Line::new(StatusIcon::Info, "No extension scripts")
    } else {
        Line::new(
            StatusIcon::Running,
            format!("Ran {} extension script(s)", report.extensions.len()),
        )
    });

    lines
}

/// Print the summary for `report` to stdout
pub fn print(report: &BootstrapReport) {
    println!();
    for line in lines(report) {
        match line.icon {
            StatusIcon::Info => println!("{} {}", line.icon.get(), line.text.dimmed()),
            _ => println!("{} {}", line.icon.get(), line.text),
        }
    }
    println!(
        "\n{} {}",
        StatusIcon::Success.get(),
        "Bootstrap complete".green().bold()
    );
}
