//! Debug logging to `~/.rw/debug.json`
//!
//! Every run appends JSON lines bracketed by `Start` and `Stop` events.
//! The file is dropped once it grows past 1 MB so it never needs manual
//! cleanup. `RW_LOG` takes an `EnvFilter` directive (default `debug`).

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::paths;

/// Environment variable holding the debug log filter
pub const LOG_ENV_VAR: &str = "RW_LOG";

/// Log files larger than this are deleted at startup
pub const MAX_LOG_BYTES: u64 = 1_000_000;

/// Install the JSON file subscriber at the default location
pub fn init() -> Result<PathBuf> {
    let path = paths::debug_log_path();
    init_at(&path)?;
    Ok(path)
}

/// Install the JSON file subscriber writing to `path`
pub fn init_at(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    discard_if_oversized(path)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open debug log {}", path.display()))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("debug"));

    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install debug logger: {e}"))?;

    tracing::debug!(at = %chrono::Utc::now().to_rfc3339(), "Start");
    Ok(())
}

/// Close out the run in the debug log
pub fn finish() {
    tracing::debug!(at = %chrono::Utc::now().to_rfc3339(), "Stop");
}

/// Delete the log when it has outgrown [`MAX_LOG_BYTES`]. Returns true if deleted.
pub fn discard_if_oversized(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_LOG_BYTES => {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove oversized log {}", path.display()))?;
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to inspect debug log {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_small_log_is_kept() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("debug.json");
        fs::write(&path, "{\"message\":\"Start\"}\n")?;

        assert!(!discard_if_oversized(&path)?);
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn test_oversized_log_is_discarded() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("debug.json");
        fs::write(&path, vec![b'x'; (MAX_LOG_BYTES + 1) as usize])?;

        assert!(discard_if_oversized(&path)?);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_missing_log_is_fine() -> Result<()> {
        let temp = TempDir::new()?;
        assert!(!discard_if_oversized(&temp.path().join("debug.json"))?);
        Ok(())
    }
}
