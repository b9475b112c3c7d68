//! Low-level git operations
//!
//! Every operation runs `git -C <dir>` so nothing depends on the process
//! working directory.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Output};

fn git(dir: &Path, args: &[&str]) -> Result<Output> {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Check if the git binary is available on PATH
pub fn git_available() -> bool {
    which::which("git").is_ok()
}

/// Check if `dir` itself holds a repository (not just sits inside one)
pub fn has_repository(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Create an empty repository in `dir`
pub fn init(dir: &Path) -> Result<()> {
    let output = git(dir, &["init", "--quiet"])?;

    if !output.status.success() {
        anyhow::bail!("git init failed: {}", stderr_of(&output));
    }

    Ok(())
}

/// Stage everything in the working tree
pub fn add_all(dir: &Path) -> Result<()> {
    let output = git(dir, &["add", "--all"])?;

    if !output.status.success() {
        anyhow::bail!("git add failed: {}", stderr_of(&output));
    }

    Ok(())
}

/// Check if anything is staged for commit
pub fn has_staged_changes(dir: &Path) -> Result<bool> {
    let output = git(dir, &["diff", "--cached", "--quiet"])?;

    // --quiet exits 1 when there are differences
    match output.status.code() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => anyhow::bail!("git diff failed: {}", stderr_of(&output)),
    }
}

/// Commit staged changes
pub fn commit(dir: &Path, message: &str) -> Result<()> {
    let output = git(dir, &["commit", "--quiet", "-m", message])?;

    if !output.status.success() {
        anyhow::bail!("git commit failed: {}", stderr_of(&output));
    }

    Ok(())
}
