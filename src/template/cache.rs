//! Tag-qualified on-disk store of template archives.
//!
//! Entries are written once through a temp file in the cache directory and
//! renamed into place, so a reader never observes a truncated archive.
//! Nothing is ever evicted: a new release tag produces a new key.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

use crate::error::{CreateError, Result};
use crate::paths;

/// Chunk size when streaming a download into the cache
const COPY_BUFFER_BYTES: usize = 64 * 1024;

/// `{tag}_{asset}`: one file name per (release, template asset).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(tag: &str, asset_name: &str) -> Self {
        // Tags may legally contain '/', keys must stay a single file name.
        let tag = tag.replace(['/', '\\'], "-");
        Self(format!("{tag}_{asset_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an archive came from on this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedArchive {
    pub path: PathBuf,
    pub hit: bool,
}

pub struct TemplateCache {
    root: PathBuf,
}

impl TemplateCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache rooted at `~/.rw/templates/`
    pub fn at_default_location() -> Self {
        Self::new(paths::templates_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Whether an entry exists. Errors other than not-found are surfaced.
    pub fn contains(&self, key: &CacheKey) -> Result<bool> {
        let path = self.path_for(key);
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CreateError::Cache { path, source }),
        }
    }

    /// Atomically publish `stream` under `key`. Returns the committed path.
    ///
    /// Failures reading `stream` go through `interrupted`; only local write,
    /// sync and rename failures are reported as cache errors.
    pub fn store<E>(
        &self,
        key: &CacheKey,
        stream: &mut dyn Read,
        interrupted: E,
    ) -> Result<PathBuf>
    where
        E: FnOnce(io::Error) -> CreateError,
    {
        self.ensure_root()?;
        let dest = self.path_for(key);
        let cache_err = |path: &Path, source: io::Error| CreateError::Cache {
            path: path.to_path_buf(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|e| cache_err(&self.root, e))?;
        let mut buf = vec![0u8; COPY_BUFFER_BYTES];
        let mut bytes: u64 = 0;
        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!(key = %key, bytes, error = %e, "download stream failed");
                    return Err(interrupted(e));
                }
            };
            tmp.as_file_mut()
                .write_all(&buf[..n])
                .map_err(|e| cache_err(&dest, e))?;
            bytes += n as u64;
        }
        tmp.as_file().sync_all().map_err(|e| cache_err(&dest, e))?;
        tmp.persist(&dest).map_err(|e| cache_err(&dest, e.error))?;

        tracing::debug!(path = %dest.display(), bytes, "template archive cached");
        Ok(dest)
    }

    /// Return the cached archive for `key`, calling `fetch` only on a miss.
    ///
    /// `interrupted` maps a failure of the fetched stream mid-download.
    pub fn resolve<F, E>(&self, key: &CacheKey, fetch: F, interrupted: E) -> Result<CachedArchive>
    where
        F: FnOnce() -> Result<Box<dyn Read>>,
        E: FnOnce(io::Error) -> CreateError,
    {
        let path = self.path_for(key);
        if self.contains(key)? {
            tracing::debug!(key = %key, path = %path.display(), "template cache hit");
            return Ok(CachedArchive { path, hit: true });
        }

        tracing::debug!(key = %key, "template cache miss");
        let started = Instant::now();
        let mut stream = fetch()?;
        let path = self.store(key, &mut stream, interrupted)?;
        tracing::debug!(
            key = %key,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "template downloaded"
        );
        Ok(CachedArchive { path, hit: false })
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| CreateError::Cache {
            path: self.root.clone(),
            source,
        })
    }
}
