//! Release lookup for published template archives.
//!
//! "Do X": Find the latest published release and stream one of its assets.
//!
//! # Design
//!
//! - **ReleaseSource**: the seam the scaffolding pipeline talks to
//! - **GitHubReleases**: GitHub REST implementation (blocking reqwest)
//! - **variant**: pure mapping from (track, language) to an asset name
//!
//! # Example
//!
//! ```ignore
//! use rw::config::Settings;
//! use rw::release::{variant, GitHubReleases, ReleaseSource};
//!
//! let source = GitHubReleases::new(&Settings::default(), None)?;
//! let release = source.latest_release()?;
//! let name = variant::asset_name(&variant::Track::default(), variant::Variant::TypeScript);
//! let asset = variant::select_asset(&release, &name)?;
//! let bytes = source.download_asset(asset)?;
//! ```

pub mod github;
pub mod variant;

pub use github::GitHubReleases;

use std::io::Read;

use crate::error::Result;

/// One point-in-time view of the latest remote release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub tag: String,
    pub assets: Vec<AssetDescriptor>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub name: String,
    pub id: u64,
}

/// Read access to a release-hosting service.
///
/// Implementations make exactly one outbound request per call and never retry.
pub trait ReleaseSource {
    /// `owner/repo` (or equivalent) for error messages.
    fn repository(&self) -> String;

    /// Latest published release with its asset list.
    fn latest_release(&self) -> Result<ReleaseDescriptor>;

    /// Byte stream of a single asset.
    fn download_asset(&self, asset: &AssetDescriptor) -> Result<Box<dyn Read>>;
}
