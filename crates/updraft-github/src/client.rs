use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

use updraft_backend::{Release, ReleaseAsset, ReleaseSource, UpdateError};

const OPERATION: &str = "latest release query";

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    pub body: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

/// Release source backed by the GitHub releases REST API.
///
/// No authentication is used; only public release metadata is queried.
pub struct GitHubReleases {
    owner: String,
    repo: String,
    user_agent: String,
    client: reqwest::Client,
}

impl GitHubReleases {
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::with_client(owner, repo, reqwest::Client::new())
    }

    #[must_use]
    pub fn with_client(
        owner: impl Into<String>,
        repo: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            user_agent: format!("updraft/{}", env!("CARGO_PKG_VERSION")),
            client,
        }
    }

    fn latest_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/releases/latest",
            self.owner, self.repo
        )
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn latest_release(&self) -> Result<Release, UpdateError> {
        let url = self.latest_url();
        debug!("Fetching latest release from {url}");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|error| UpdateError::network_request_from(OPERATION, error))?;

        let status = response.status();
        // GitHub answers 404 for repositories that have never published.
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UpdateError::NoReleases);
        }
        if !status.is_success() {
            let body_snippet = response
                .text()
                .await
                .ok()
                .map(|body| response_snippet(&body, 160))
                .unwrap_or_default();
            return Err(UpdateError::network_request(
                OPERATION,
                format!("HTTP {status}{body_snippet}"),
            ));
        }

        let payload: GitHubRelease = response
            .json()
            .await
            .map_err(|error| UpdateError::network_parse_from(OPERATION, error))?;

        release_from_payload(payload)
    }
}

fn release_from_payload(payload: GitHubRelease) -> Result<Release, UpdateError> {
    let version = payload.tag_name.parse()?;
    Ok(Release {
        tag: payload.tag_name,
        version,
        assets: payload
            .assets
            .into_iter()
            .map(|asset| ReleaseAsset {
                name: asset.name,
                download_url: asset.browser_download_url,
                size: asset.size,
            })
            .collect(),
        notes: payload.body,
        published_at: payload.published_at,
    })
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}
