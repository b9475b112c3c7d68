//! GitHub ReleaseSource implementation.
//!
//! "Do X": Look up the latest release of a repository and download its assets.
//!
//! Uses the REST API directly with a blocking reqwest client.
//! All HTTP interaction hidden in internal.rs.

mod internal;

use reqwest::blocking::Client as HttpClient;
use std::io::Read;
use std::time::Duration;

use super::{AssetDescriptor, ReleaseDescriptor, ReleaseSource};
use crate::config::{self, Settings};
use crate::error::{CreateError, Result};

/// GitHub implementation of ReleaseSource.
pub struct GitHubReleases {
    http: HttpClient,
    api_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GitHubReleases {
    /// Build a client for the repository named in `settings`.
    ///
    /// The token only raises rate limits; it is logged redacted.
    pub fn new(settings: &Settings, token: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CreateError::RemoteUnavailable {
                repo: settings.repo_spec(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        if let Some(token) = &token {
            tracing::debug!(token = %config::redact(token), "using GitHub token");
        }

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            owner: settings.owner.clone(),
            repo: settings.repo.clone(),
            token,
        })
    }

    fn repo_spec(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl ReleaseSource for GitHubReleases {
    fn repository(&self) -> String {
        self.repo_spec()
    }

    fn latest_release(&self) -> Result<ReleaseDescriptor> {
        internal::fetch_latest_release(self)
    }

    fn download_asset(&self, asset: &AssetDescriptor) -> Result<Box<dyn Read>> {
        internal::download_asset(self, asset)
    }
}
