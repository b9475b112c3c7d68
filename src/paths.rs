//! Single source of truth for ALL rw filesystem layout.
//!
//! This module defines WHERE data lives. It has no I/O, no validation,
//! no business logic. One file shows the entire filesystem layout.
//!
//! # User-Level Paths (~/.rw/)
//!
//! ```text
//! ~/.rw/
//! ├── config.toml              # Optional settings (owner, repo, api_url, ...)
//! ├── debug.json               # JSON debug log, one event per line
//! └── templates/               # Cached template archives
//!     └── v3.2.0_arapaho_ts.zip
//! ```
//!
//! `RW_HOME` replaces `~/.rw` entirely (CI and tests point it at a temp dir).

use std::path::PathBuf;

/// Environment variable overriding the rw home directory.
pub const HOME_ENV_VAR: &str = "RW_HOME";

/// Directory name under the user's home.
const DIR_NAME: &str = ".rw";

/// User's rw home directory: `~/.rw/` (or `$RW_HOME`)
pub fn rw_home() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DIR_NAME)
}

/// Settings file: `~/.rw/config.toml`
pub fn config_path() -> PathBuf {
    rw_home().join("config.toml")
}

/// Debug log: `~/.rw/debug.json`
pub fn debug_log_path() -> PathBuf {
    rw_home().join("debug.json")
}

/// Template cache root: `~/.rw/templates/`
pub fn templates_dir() -> PathBuf {
    rw_home().join("templates")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_rooted_at_home() {
        let home = rw_home();
        assert!(config_path().starts_with(&home));
        assert!(debug_log_path().starts_with(&home));
        assert!(templates_dir().starts_with(&home));
        assert!(templates_dir().ends_with("templates"));
    }
}
