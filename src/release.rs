//! Release source client and release data types

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, UpdateError};

/// Default base URL of the release-hosting API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Release information as served by the release source
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "v1.2.3")
    pub tag_name: String,

    /// Release name
    #[serde(default)]
    pub name: Option<String>,

    /// Whether this is a prerelease
    #[serde(default)]
    pub prerelease: bool,

    /// Published date
    #[serde(default)]
    pub published_at: Option<String>,

    /// Release assets
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// First asset (in listed order) whose name contains `platform`
    ///
    /// Substring containment tolerates prefixes, suffixes and archive
    /// extensions (`app_linux-amd64.tar.gz` matches `linux-amd64`),
    /// but platform strings that are substrings of one another (`arm`
    /// and `arm64`) can select the wrong asset. Callers with such
    /// release layouts should pass a more specific platform string.
    pub fn platform_asset(&self, platform: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| a.name.contains(platform))
    }
}

/// A single downloadable file attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Opaque asset identifier used for the download endpoint
    pub id: u64,

    /// Asset name
    pub name: String,

    /// Asset size in bytes; used only for progress totals
    #[serde(default)]
    pub size: u64,
}

/// Client for the release-hosting API
///
/// Fetches the latest release for an owner/repo pair and exposes the
/// per-asset download endpoint. No retries: transient failures are
/// surfaced to the caller. Deadlines come from the underlying
/// `reqwest::Client` timeout; dropping an in-flight future cancels the
/// request.
pub struct ReleaseClient {
    client: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
}

impl ReleaseClient {
    /// Create a client with the default HTTP transport
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(
            owner,
            repo,
            default_client(crate::updater::DEFAULT_TIMEOUT)?,
        ))
    }

    /// Create a client over a caller-supplied HTTP transport
    ///
    /// The supplied client should disable redirect following; with it
    /// enabled, asset downloads served via redirect are followed
    /// silently instead of failing fast.
    pub fn with_client(
        owner: impl Into<String>,
        repo: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Override the API base URL (primarily for tests)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        let url = api_url.into();
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch the latest release
    pub async fn get_latest(&self) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, self.owner, self.repo
        );

        debug!("fetching latest release from {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Status { status, url });
        }

        let release: Release = response.json().await?;
        Ok(release)
    }

    /// Download URL for an asset id
    pub(crate) fn asset_url(&self, asset_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/releases/assets/{}",
            self.api_url, self.owner, self.repo, asset_id
        )
    }

    /// Underlying HTTP client
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Build the default HTTP client
///
/// Redirects are never followed so that asset downloads served via
/// redirect surface as responses the downloader can reject.
pub(crate) fn default_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("updraft/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .build()?;
    Ok(client)
}
