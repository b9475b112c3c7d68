//! Create a new Redwood project from the latest published template
//!
//! This module follows the dependable-rust pattern:
//! - Public interface (this file): flags and a single entry point
//! - Internal implementation: All logic in internal/ submodules
//!
//! # Process
//!
//! 1. **Preflight**: node and yarn must be installed
//! 2. **Options**: flags, falling back to prompts when interactive
//! 3. **Target**: validated before anything is downloaded or written
//! 4. **Template**: latest release, cached under `~/.rw/templates/`
//! 5. **Materialize**: archive expanded into the target
//! 6. **Git / install**: optional, failures only warn

mod internal;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Directory to create the project in [default: ./redwood-app]
    pub target: Option<PathBuf>,

    /// Skip prompts and use defaults
    #[arg(short, long)]
    pub yes: bool,

    /// Create even if target directory isn't empty
    #[arg(long)]
    pub overwrite: bool,

    /// Generate a TypeScript project [default: true]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub typescript: Option<bool>,

    /// Initialize a git repository [default: true]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub git_init: Option<bool>,

    /// Commit message for the initial commit [default: "initial commit"]
    #[arg(short = 'm', long)]
    pub commit_message: Option<String>,

    /// Run yarn install in the new project [default: false]
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub install: Option<bool>,

    /// Template track to use [default: arapaho]
    #[arg(long, alias = "epoch", conflicts_with = "bighorn")]
    pub track: Option<String>,

    /// Use the bighorn template track
    #[arg(long)]
    pub bighorn: bool,
}

/// Execute the create command
///
/// # Errors
///
/// Returns an error if:
/// - node or yarn is missing
/// - The target is a file, or a non-empty directory without --overwrite
/// - The release service is unreachable or has no matching template
/// - The template cannot be cached or extracted
pub fn execute(args: CreateArgs) -> Result<()> {
    internal::execute_create(args)
}
