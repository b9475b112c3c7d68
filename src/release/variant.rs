//! Map user intent (track + language) to a concrete template asset.
//!
//! Pure functions, no I/O.

use std::fmt;

use super::{AssetDescriptor, ReleaseDescriptor};
use crate::error::{CreateError, Result};

/// Language flavor of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    TypeScript,
    JavaScript,
}

impl Variant {
    pub fn from_typescript(typescript: bool) -> Self {
        if typescript {
            Variant::TypeScript
        } else {
            Variant::JavaScript
        }
    }

    /// Suffix used in asset names
    pub fn suffix(self) -> &'static str {
        match self {
            Variant::TypeScript => "ts",
            Variant::JavaScript => "js",
        }
    }
}

/// A named template lineage, e.g. `arapaho` or `bighorn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track(String);

impl Track {
    pub const DEFAULT: &'static str = "arapaho";
    pub const BIGHORN: &'static str = "bighorn";

    /// Track names end up in cache file names, so they must be plain names.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && !name.contains("..")
            && !name.chars().any(char::is_whitespace);
        if !plain {
            return Err(CreateError::InvalidTrack(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Track {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asset name for a track and language: `{track}_{ts|js}.zip`
pub fn asset_name(track: &Track, variant: Variant) -> String {
    format!("{}_{}.zip", track, variant.suffix())
}

/// Exact, case-sensitive match of `name` against the release's assets.
///
/// A miss is a publishing defect, not a transient failure.
pub fn select_asset<'a>(release: &'a ReleaseDescriptor, name: &str) -> Result<&'a AssetDescriptor> {
    release
        .assets
        .iter()
        .find(|asset| asset.name == name)
        .ok_or_else(|| CreateError::AssetNotFound {
            tag: release.tag.clone(),
            asset: name.to_string(),
        })
}
