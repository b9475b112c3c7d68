//! Preflight checks - ensure the JavaScript toolchain is ready before scaffolding.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Command;

/// Tools a generated project cannot be used without
pub const REQUIRED_TOOLS: &[&str] = &["node", "yarn"];

/// A located tool and the version it reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    pub name: String,
    pub locations: Vec<PathBuf>,
    pub version: String,
}

/// Locate every required tool. Fails on the first one missing.
pub fn check_toolchain() -> Result<Vec<ToolReport>> {
    REQUIRED_TOOLS.iter().map(|tool| check_tool(tool)).collect()
}

/// Find all installations of `name` on PATH and ask the first one for its version.
pub fn check_tool(name: &str) -> Result<ToolReport> {
    let locations: Vec<PathBuf> = which::which_all(name)
        .map(|found| found.collect())
        .unwrap_or_default();
    if locations.is_empty() {
        bail!("{name} not found");
    }

    let output = Command::new(name)
        .arg("--version")
        .output()
        .with_context(|| format!("Failed to run {name} --version"))?;
    if !output.status.success() {
        bail!(
            "{name} --version failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let report = ToolReport {
        name: name.to_string(),
        locations,
        version: parse_version(&String::from_utf8_lossy(&output.stdout)),
    };
    tracing::debug!(tool = name, version = %report.version, "tool check passed");
    Ok(report)
}

/// First non-empty line of `--version` output
fn parse_version(stdout: &str) -> String {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("v20.11.1\n"), "v20.11.1");
        assert_eq!(parse_version("\n  1.22.19  \nextra"), "1.22.19");
        assert_eq!(parse_version(""), "unknown");
    }

    #[test]
    fn test_missing_tool_is_an_error() {
        let err = check_tool("rw-definitely-not-a-real-tool").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
