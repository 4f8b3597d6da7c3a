//! Idempotent git configuration
//!
//! Each operation reads the current value first and writes only when the
//! desired state is not already present, so re-running a bootstrap leaves the
//! configuration file untouched.

use crate::{ConfigStore, Result};
use repoboot_config::GitSettings;

/// Outcome of an idempotent mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The store was written
    Applied,
    /// The desired state was already present
    Unchanged,
}

impl Change {
    /// Whether anything was written
    pub fn is_applied(self) -> bool {
        matches!(self, Change::Applied)
    }
}

/// Set a single-valued key, skipping the write when it already holds `value`
pub fn set_if_changed(store: &dyn ConfigStore, key: &str, value: &str) -> Result<Change> {
    if store.get(key)?.as_deref() == Some(value) {
        tracing::debug!(key, value, "Already configured");
        return Ok(Change::Unchanged);
    }

    store.set(key, value)?;
    tracing::info!(key, value, "Configured");
    Ok(Change::Applied)
}

/// Append `value` to a multi-valued key unless an identical value is present
///
/// Existing values are never modified or reordered.
pub fn ensure_value(store: &dyn ConfigStore, key: &str, value: &str) -> Result<Change> {
    let existing = store.get_all(key)?;
    if existing.iter().any(|present| present == value) {
        tracing::debug!(key, value, "Value already present");
        return Ok(Change::Unchanged);
    }

    store.add(key, value)?;
    tracing::info!(key, value, "Added value");
    Ok(Change::Applied)
}

/// `pull.rebase`
pub fn apply_pull_rebase(store: &dyn ConfigStore, git: &GitSettings) -> Result<Change> {
    set_if_changed(store, "pull.rebase", &git.pull_rebase)
}

/// `blame.ignoreRevisionsFile`
pub fn apply_blame_ignore(store: &dyn ConfigStore, git: &GitSettings) -> Result<Change> {
    set_if_changed(store, "blame.ignoreRevisionsFile", &git.blame_ignore_file)
}

/// Make the configured remote fetch pull request heads
pub fn ensure_pull_request_fetch(store: &dyn ConfigStore, git: &GitSettings) -> Result<Change> {
    ensure_value(store, &git.fetch_key(), &git.pull_request_refspec())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::Error;
    use crate::git::MemoryConfig;

    const HEADS: &str = "+refs/heads/*:refs/remotes/origin/*";
    const PULLS: &str = "+refs/pull/*/head:refs/remotes/origin/pr/*";
    const KEYS: &[&str] = &[
        "pull.rebase",
        "blame.ignoreRevisionsFile",
        "remote.origin.fetch",
    ];

    fn apply_all(store: &dyn ConfigStore, git: &GitSettings) -> Vec<Change> {
        vec![
            apply_pull_rebase(store, git).unwrap(),
            apply_blame_ignore(store, git).unwrap(),
            ensure_pull_request_fetch(store, git).unwrap(),
        ]
    }

    #[test]
    fn test_first_run_applies_everything() {
        let store = MemoryConfig::new().with_value("remote.origin.fetch", HEADS);
        let git = GitSettings::default();

        let changes = apply_all(&store, &git);

        assert!(changes.iter().all(|c| c.is_applied()));
        assert_eq!(store.values("pull.rebase"), vec!["true"]);
        assert_eq!(
            store.values("blame.ignoreRevisionsFile"),
            vec![".git-blame-ignore-revs"]
        );
        assert_eq!(
            store.values("remote.origin.fetch"),
            vec![HEADS, PULLS]
        );
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let store = MemoryConfig::new().with_value("remote.origin.fetch", HEADS);
        let git = GitSettings::default();

        apply_all(&store, &git);
        let writes = store.write_count();
        let snapshot: Vec<_> = KEYS.iter().map(|key| store.values(key)).collect();

        let changes = apply_all(&store, &git);

        assert_eq!(changes, vec![Change::Unchanged; 3]);
        assert_eq!(store.write_count(), writes);
        let after: Vec<_> = KEYS.iter().map(|key| store.values(key)).collect();
        assert_eq!(after, snapshot);
    }

    #[test]
    fn test_refspec_present_is_not_duplicated() {
        let store = MemoryConfig::new()
            .with_value("remote.origin.fetch", PULLS)
            .with_value("remote.origin.fetch", HEADS);

        let change = ensure_pull_request_fetch(&store, &GitSettings::default()).unwrap();

        assert_eq!(change, Change::Unchanged);
        assert_eq!(store.values("remote.origin.fetch"), vec![PULLS, HEADS]);
    }

    #[test]
    fn test_refspec_absent_keeps_prior_values() {
        let mirror = "+refs/tags/*:refs/tags/*";
        let store = MemoryConfig::new()
            .with_value("remote.origin.fetch", HEADS)
            .with_value("remote.origin.fetch", mirror);

        ensure_pull_request_fetch(&store, &GitSettings::default()).unwrap();

        assert_eq!(
            store.values("remote.origin.fetch"),
            vec![HEADS, mirror, PULLS]
        );
    }

    #[test]
    fn test_different_value_is_overwritten() {
        let store = MemoryConfig::new().with_value("pull.rebase", "false");

        let change = apply_pull_rebase(&store, &GitSettings::default()).unwrap();

        assert_eq!(change, Change::Applied);
        assert_eq!(store.values("pull.rebase"), vec!["true"]);
    }

    #[test]
    fn test_other_remote() {
        let store = MemoryConfig::new();
        let git = GitSettings {
            remote: "upstream".to_string(),
            ..GitSettings::default()
        };

        ensure_pull_request_fetch(&store, &git).unwrap();

        assert_eq!(
            store.values("remote.upstream.fetch"),
            vec!["+refs/pull/*/head:refs/remotes/upstream/pr/*"]
        );
        assert!(store.values("remote.origin.fetch").is_empty());
    }

    #[test]
    fn test_write_failure_names_key() {
        let store = MemoryConfig::new().failing_on("blame.ignoreRevisionsFile");
        let git = GitSettings::default();

        apply_pull_rebase(&store, &git).unwrap();
        let err = apply_blame_ignore(&store, &git).unwrap_err();

        match err {
            Error::ConfigWrite { key, .. } => assert_eq!(key, "blame.ignoreRevisionsFile"),
            other => panic!("expected config write error, got {other:?}"),
        }
    }
}
