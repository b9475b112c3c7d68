//! Target directory validation
//!
//! Checked once before anything is written: the target must not exist, or be
//! an empty directory, or the caller asked to overwrite. Overwrite never
//! deletes anything; the template is laid over what is there.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CreateError, Result};

/// Default project directory when none is given
pub const DEFAULT_TARGET: &str = "./redwood-app";

/// A validated, absolute target directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirectory {
    pub path: PathBuf,
    pub existed: bool,
}

impl TargetDirectory {
    /// Create the directory (and ancestors) if validation found it missing.
    pub fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.path).map_err(|source| CreateError::TargetUnreadable {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "target directory ready");
        Ok(())
    }
}

/// Resolve `path` to an absolute form and check it is safe to write into.
pub fn validate(path: &Path, overwrite: bool) -> Result<TargetDirectory> {
    let unreadable = |path: &Path, source: io::Error| CreateError::TargetUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let absolute = std::path::absolute(path).map_err(|e| unreadable(path, e))?;

    let meta = match fs::metadata(&absolute) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(TargetDirectory {
                path: absolute,
                existed: false,
            });
        }
        Err(e) => return Err(unreadable(&absolute, e)),
    };

    if !meta.is_dir() {
        return Err(CreateError::NotADirectory(absolute));
    }

    if !overwrite && !is_empty(&absolute).map_err(|e| unreadable(&absolute, e))? {
        return Err(CreateError::DirectoryNotEmpty(absolute));
    }

    Ok(TargetDirectory {
        path: absolute,
        existed: true,
    })
}

/// A single bounded read of the directory, never a recursive scan.
pub fn is_empty(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_target_is_valid() {
        let temp = TempDir::new().unwrap();
        let wanted = temp.path().join("new-app");

        let target = validate(&wanted, false).unwrap();
        assert!(target.path.is_absolute());
        assert_eq!(target.path, wanted);
        assert!(!target.existed);
        assert!(!wanted.exists());

        target.ensure_exists().unwrap();
        assert!(wanted.is_dir());
    }

    #[test]
    fn test_relative_target_becomes_absolute() {
        let target = validate(Path::new("definitely-not-here-rw-app"), false).unwrap();
        assert!(target.path.is_absolute());
        assert!(target.path.ends_with("definitely-not-here-rw-app"));
    }

    #[test]
    fn test_empty_directory_is_valid() {
        let temp = TempDir::new().unwrap();
        let target = validate(temp.path(), false).unwrap();
        assert!(target.existed);
    }

    #[test]
    fn test_non_empty_directory_needs_overwrite() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "hello").unwrap();

        let err = validate(temp.path(), false).unwrap_err();
        assert!(matches!(err, CreateError::DirectoryNotEmpty(_)));

        let target = validate(temp.path(), true).unwrap();
        assert!(target.existed);
        assert!(temp.path().join("README.md").exists());
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app");
        fs::write(&file, "not a dir").unwrap();

        let err = validate(&file, true).unwrap_err();
        assert!(matches!(err, CreateError::NotADirectory(_)));
    }

    #[test]
    fn test_hidden_entries_count_as_content() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        assert!(!is_empty(temp.path()).unwrap());
    }
}
