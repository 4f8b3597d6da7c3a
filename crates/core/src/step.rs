//! Names of the bootstrap steps
//!
//! A failing step is reported by name, so every stage the orchestrator runs
//! has a variant here.

use std::fmt;

/// One stage of a bootstrap run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Resolve the program's own directory and enter it
    Locate,
    /// Open the repository containing the program
    Discover,
    /// Load `.repoboot.toml`
    Settings,
    /// Verify external tools are on the search path
    Requirements,
    /// `pull.rebase`
    PullRebase,
    /// `blame.ignoreRevisionsFile`
    BlameIgnore,
    /// Pull request refspec in `remote.<name>.fetch`
    PullRequestFetch,
    /// Per-hook dispatch shim links
    LinkHooks,
    /// Active hooks directory binding
    ActivateHooks,
    /// Extension scripts
    Extensions,
}

impl Step {
    /// Human-readable description, phrased to follow "Failed to"
    pub const fn description(self) -> &'static str {
        match self {
            Step::Locate => "locate the program directory",
            Step::Discover => "discover the repository",
            Step::Settings => "load settings",
            Step::Requirements => "check requirements",
            Step::PullRebase => "configure pull.rebase",
            Step::BlameIgnore => "configure blame.ignoreRevisionsFile",
            Step::PullRequestFetch => "configure pull request fetching",
            Step::LinkHooks => "link git hooks",
            Step::ActivateHooks => "activate repository hooks",
            Step::Extensions => "run extension scripts",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
