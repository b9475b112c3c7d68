//! Internal HTTP implementation for GitHub releases

use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use std::io::Read;

use super::GitHubReleases;
use crate::error::{CreateError, Result};
use crate::release::{AssetDescriptor, ReleaseDescriptor};

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    tag_name: Option<String>,
    #[serde(default)]
    assets: Vec<AssetResponse>,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    id: u64,
    name: String,
}

/// `GET /repos/{owner}/{repo}/releases/latest`
pub(super) fn fetch_latest_release(client: &GitHubReleases) -> Result<ReleaseDescriptor> {
    let url = format!(
        "{}/repos/{}/{}/releases/latest",
        client.api_url, client.owner, client.repo
    );
    let response = send(client, client.http.get(&url), "application/vnd.github+json")?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(CreateError::NoReleaseFound {
            repo: client.repo_spec(),
        });
    }
    let response = ensure_success(client, response)?;

    let body = response.text().map_err(|e| unavailable(client, e))?;
    let release = parse_release(&body, &client.repo_spec())?;
    tracing::debug!(tag = %release.tag, assets = release.assets.len(), "latest release");
    Ok(release)
}

/// `GET /repos/{owner}/{repo}/releases/assets/{id}` as raw bytes
pub(super) fn download_asset(
    client: &GitHubReleases,
    asset: &AssetDescriptor,
) -> Result<Box<dyn Read>> {
    let url = format!(
        "{}/repos/{}/{}/releases/assets/{}",
        client.api_url, client.owner, client.repo, asset.id
    );
    let response = send(client, client.http.get(&url), "application/octet-stream")?;
    let response = ensure_success(client, response)?;
    tracing::debug!(
        asset = %asset.name,
        id = asset.id,
        bytes = ?response.content_length(),
        "asset download started"
    );
    Ok(Box::new(response))
}

/// Turn a release JSON body into a descriptor, preserving asset order.
pub(super) fn parse_release(body: &str, repo: &str) -> Result<ReleaseDescriptor> {
    let parsed: ReleaseResponse =
        serde_json::from_str(body).map_err(|e| CreateError::RemoteUnavailable {
            repo: repo.to_string(),
            reason: format!("unexpected release payload: {e}"),
        })?;

    let tag = parsed
        .tag_name
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CreateError::NoReleaseFound {
            repo: repo.to_string(),
        })?;

    Ok(ReleaseDescriptor {
        tag,
        assets: parsed
            .assets
            .into_iter()
            .map(|a| AssetDescriptor {
                name: a.name,
                id: a.id,
            })
            .collect(),
    })
}

fn send(client: &GitHubReleases, request: RequestBuilder, accept: &str) -> Result<Response> {
    let mut request = request
        .header(ACCEPT, accept)
        .header("X-GitHub-Api-Version", API_VERSION);
    if let Some(token) = &client.token {
        request = request.bearer_auth(token);
    }
    request.send().map_err(|e| unavailable(client, e))
}

fn ensure_success(client: &GitHubReleases, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        format!("HTTP {status} (rate limited? set RW_GITHUB_TOKEN)")
    } else {
        format!("HTTP {status}")
    };
    Err(CreateError::RemoteUnavailable {
        repo: client.repo_spec(),
        reason,
    })
}

fn unavailable(client: &GitHubReleases, e: reqwest::Error) -> CreateError {
    CreateError::RemoteUnavailable {
        repo: client.repo_spec(),
        reason: e.to_string(),
    }
}
