//! Optional dependency install in the generated project.
//!
//! Shells out to `yarn install` with inherited stdio and reports the exit
//! status and how long it took. A failed install is a soft error.

use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::{Duration, Instant};

use crate::error::{CreateError, Result};

/// Package manager used for the install step
pub const PACKAGE_MANAGER: &str = "yarn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallReport {
    pub status: ExitStatus,
    pub elapsed: Duration,
}

/// Run `yarn install` in `dir`.
pub fn install_dependencies(dir: &Path) -> Result<InstallReport> {
    run(Command::new(PACKAGE_MANAGER).arg("install").current_dir(dir), dir)
}

fn run(command: &mut Command, dir: &Path) -> Result<InstallReport> {
    let started = Instant::now();
    let status = command
        .status()
        .map_err(|e| CreateError::DependencyInstallFailed {
            path: dir.to_path_buf(),
            reason: format!("failed to start {PACKAGE_MANAGER}: {e}"),
        })?;
    let elapsed = started.elapsed();

    tracing::debug!(
        status = %status,
        elapsed_ms = elapsed.as_millis() as u64,
        "dependency install finished"
    );

    if !status.success() {
        return Err(CreateError::DependencyInstallFailed {
            path: dir.to_path_buf(),
            reason: format!("{PACKAGE_MANAGER} install exited with {status}"),
        });
    }

    Ok(InstallReport { status, elapsed })
}
