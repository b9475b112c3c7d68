use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::paths;

/// Environment variable holding the optional GitHub bearer token
pub const TOKEN_ENV_VAR: &str = "RW_GITHUB_TOKEN";

/// Ambient settings for rw, read from `~/.rw/config.toml` when present
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Owner of the repository publishing template releases
    pub owner: String,
    /// Repository publishing template releases
    pub repo: String,
    /// GitHub REST API base URL
    pub api_url: String,
    /// User-Agent sent with every request (GitHub rejects requests without one)
    pub user_agent: String,
    /// Per-request timeout for release lookups and downloads
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            owner: "redwoodjs".to_string(),
            repo: "rw-cli".to_string(),
            api_url: "https://api.github.com".to_string(),
            user_agent: concat!("rw-cli/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 300,
        }
    }
}

impl Settings {
    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Load settings from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    /// `owner/repo` for messages and logs
    pub fn repo_spec(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Bearer token from the environment, if set and non-empty
    pub fn token() -> Option<String> {
        std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty())
    }
}

/// Only the last four characters of a token are ever surfaced, and none
/// at all when that would be the whole token
pub fn redact(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "…".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let settings = Settings::load_from(&temp.path().join("config.toml"))?;
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.repo_spec(), "redwoodjs/rw-cli");
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "owner = \"acme\"\ntimeout_secs = 30\n")?;

        let settings = Settings::load_from(&path)?;
        assert_eq!(settings.owner, "acme");
        assert_eq!(settings.repo, "rw-cli");
        assert_eq!(settings.timeout_secs, 30);
        Ok(())
    }

    #[test]
    fn test_unknown_keys_rejected() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "ownr = \"typo\"\n")?;

        assert!(Settings::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_redact_keeps_only_suffix() {
        assert_eq!(redact("ghp_abcdefgh1234"), "…1234");
        assert_eq!(redact("abcde"), "…bcde");
    }

    #[test]
    fn test_redact_hides_short_tokens_entirely() {
        assert_eq!(redact("ab"), "…");
        assert_eq!(redact("abcd"), "…");
        assert_eq!(redact(""), "…");
    }
}
