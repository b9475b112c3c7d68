//! Git repository setup for freshly scaffolded projects
//!
//! Handles:
//! - Detecting an existing repository in the target
//! - `git init`, staging the whole tree, and the first commit
//!
//! Failures here are soft: the project files exist regardless.

mod operations;

pub use operations::{add_all, commit, git_available, has_repository, has_staged_changes, init};

use std::path::Path;

use crate::error::{CreateError, Result};

/// Default message for the first commit
pub const DEFAULT_COMMIT_MESSAGE: &str = "initial commit";

/// What `initialize` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitOutcome {
    Committed,
    AlreadyInitialized,
}

/// Initialize a repository in `dir` and commit everything with `message`.
///
/// An existing repository is left untouched and reported, not treated as an error.
pub fn initialize(dir: &Path, message: &str) -> Result<GitOutcome> {
    if has_repository(dir) {
        tracing::warn!(path = %dir.display(), "git repository already exists, skipping git init");
        return Ok(GitOutcome::AlreadyInitialized);
    }

    let failed = |reason: String| CreateError::VersionControlInitFailed {
        path: dir.to_path_buf(),
        reason,
    };

    if !git_available() {
        return Err(failed("git not found on PATH".to_string()));
    }

    init(dir).map_err(|e| failed(format!("{e:#}")))?;
    add_all(dir).map_err(|e| failed(format!("{e:#}")))?;

    if !has_staged_changes(dir).map_err(|e| failed(format!("{e:#}")))? {
        return Err(failed("nothing to commit".to_string()));
    }

    commit(dir, message).map_err(|e| failed(format!("{e:#}")))?;
    tracing::debug!(commit_message = message, "initial commit complete");
    Ok(GitOutcome::Committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_existing_repository_is_left_alone() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();

        let outcome = initialize(temp.path(), DEFAULT_COMMIT_MESSAGE).unwrap();
        assert_eq!(outcome, GitOutcome::AlreadyInitialized);
    }

    #[test]
    fn test_failure_is_soft() {
        if !git_available() {
            println!("git not installed, skipping");
            return;
        }
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");

        let err = initialize(&missing, DEFAULT_COMMIT_MESSAGE).unwrap_err();
        assert!(err.is_soft());
        assert!(matches!(err, CreateError::VersionControlInitFailed { .. }));
    }
}
