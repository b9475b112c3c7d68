//! Error types for the scaffolding pipeline
//!
//! Every pipeline stage returns a [`CreateError`] so the CLI can decide
//! presentation and exit code in one place. Messages carry the path, asset or
//! release tag needed to retry correctly.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline stages
pub type Result<T> = std::result::Result<T, CreateError>;

#[derive(Error, Debug)]
pub enum CreateError {
    #[error("Release service unavailable for {repo}: {reason}")]
    RemoteUnavailable { repo: String, reason: String },

    #[error("No published release found for {repo}")]
    NoReleaseFound { repo: String },

    #[error("Release {tag} has no template asset named '{asset}'")]
    AssetNotFound { tag: String, asset: String },

    #[error("Invalid template track '{0}': expected a plain name like 'arapaho'")]
    InvalidTrack(String),

    #[error("Target {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Target directory {} is not empty (use --overwrite to create anyway)", .0.display())]
    DirectoryNotEmpty(PathBuf),

    #[error("Failed to inspect target {}: {source}", path.display())]
    TargetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template cache error at {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract {} into {}: {reason}", archive.display(), target.display())]
    ExtractionFailed {
        archive: PathBuf,
        target: PathBuf,
        reason: String,
    },

    #[error("Git initialization failed in {}: {reason}", path.display())]
    VersionControlInitFailed { path: PathBuf, reason: String },

    #[error("Dependency install failed in {}: {reason}", path.display())]
    DependencyInstallFailed { path: PathBuf, reason: String },
}

impl CreateError {
    /// Soft errors are reported as warnings; the scaffolded files exist regardless.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            CreateError::VersionControlInitFailed { .. }
                | CreateError::DependencyInstallFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = CreateError::AssetNotFound {
            tag: "v3.2.0".to_string(),
            asset: "arapaho_ts.zip".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("v3.2.0"));
        assert!(msg.contains("arapaho_ts.zip"));

        let err = CreateError::DirectoryNotEmpty(PathBuf::from("/tmp/app"));
        assert!(err.to_string().contains("/tmp/app"));
        assert!(err.to_string().contains("--overwrite"));
    }

    #[test]
    fn test_only_git_and_install_are_soft() {
        assert!(CreateError::VersionControlInitFailed {
            path: PathBuf::from("."),
            reason: "no identity".to_string(),
        }
        .is_soft());
        assert!(CreateError::DependencyInstallFailed {
            path: PathBuf::from("."),
            reason: "exit status 1".to_string(),
        }
        .is_soft());
        assert!(!CreateError::NotADirectory(PathBuf::from("file.txt")).is_soft());
        assert!(!CreateError::NoReleaseFound {
            repo: "redwoodjs/rw-cli".to_string()
        }
        .is_soft());
    }
}
