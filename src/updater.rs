//! Update orchestration: check the release source, download, swap

use std::path::PathBuf;
use std::time::Duration;

use semver::Version;
use tracing::{debug, info};

use crate::download::AssetDownloader;
use crate::error::{Result, UpdateError};
use crate::release::{default_client, Release, ReleaseClient};
use crate::swap::BinarySwapper;
use crate::version::{parse_tag, CheckPolicy};

/// Deadline applied to release source requests when the caller does
/// not supply an HTTP client of their own
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of a latest-version check
///
/// On any failure `up_to_date` is `true`: the check never steers a
/// caller toward an update it could not confirm. Inspect `error` to
/// tell a confirmed "up to date" from a failed check.
#[derive(Debug)]
pub struct CheckReport {
    /// Whether the current version counts as up to date under the
    /// policy the check ran with; `true` whenever `error` is set
    pub up_to_date: bool,

    /// Tag of the latest release, when the source answered
    pub latest: Option<String>,

    /// The failure, if the check could not complete
    pub error: Option<UpdateError>,
}

impl CheckReport {
    fn failed(error: UpdateError) -> Self {
        Self {
            up_to_date: true,
            latest: None,
            error: Some(error),
        }
    }
}

/// Orchestrates the self-update flow for one executable
///
/// A single instance drives one check-then-update sequence:
/// [`check_latest`](Updater::check_latest) records the latest release,
/// [`update`](Updater::update) consumes it. Operations take `&mut
/// self`; an instance is meant for one caller at a time and carries no
/// internal synchronization.
pub struct Updater {
    current: Version,
    platform: String,
    source: ReleaseClient,
    downloader: AssetDownloader,
    swapper: BinarySwapper,
    latest: Option<Release>,
}

impl Updater {
    /// Start building an updater for `owner/repo` at `current` version
    pub fn builder(
        owner: impl Into<String>,
        repo: impl Into<String>,
        current: Version,
    ) -> UpdaterBuilder {
        UpdaterBuilder::new(owner, repo, current)
    }

    /// Build an updater with all defaults
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        current: Version,
    ) -> Result<Self> {
        Self::builder(owner, repo, current).build()
    }

    /// The version this updater considers current
    pub fn current_version(&self) -> &Version {
        &self.current
    }

    /// The platform string used for asset selection
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Check whether the current version is the latest
    ///
    /// Uses [`CheckPolicy::AtLeast`]: a remote version no newer than
    /// the current one counts as up to date.
    pub async fn check_latest(&mut self) -> CheckReport {
        self.check_latest_with(CheckPolicy::AtLeast).await
    }

    /// Check with an explicit up-to-date policy
    ///
    /// On success the release's assets are recorded for a subsequent
    /// [`update`](Updater::update); a new check discards the previous
    /// record.
    pub async fn check_latest_with(&mut self, policy: CheckPolicy) -> CheckReport {
        self.latest = None;

        let release = match self.source.get_latest().await {
            Ok(release) => release,
            Err(e) => return CheckReport::failed(e),
        };

        let remote = match parse_tag(&release.tag_name) {
            Ok(version) => version,
            Err(e) => return CheckReport::failed(e),
        };

        let up_to_date = policy.up_to_date(&self.current, &remote);

        debug!(
            "latest release {} (current {}): up_to_date={}",
            release.tag_name, self.current, up_to_date
        );

        let tag = release.tag_name.clone();
        self.latest = Some(release);

        CheckReport {
            up_to_date,
            latest: Some(tag),
            error: None,
        }
    }

    /// Download the platform asset of the last-checked release and
    /// swap it into place
    ///
    /// Acts only on release state recorded by a prior successful
    /// check; without one, fails with
    /// [`UpdateError::AssetNotFound`] before any network I/O. The
    /// recorded release is consumed by the attempt, successful or not.
    pub async fn update(&mut self) -> Result<()> {
        let release = self.latest.take().ok_or_else(|| UpdateError::AssetNotFound {
            platform: self.platform.clone(),
        })?;

        let asset = release
            .platform_asset(&self.platform)
            .ok_or_else(|| UpdateError::AssetNotFound {
                platform: self.platform.clone(),
            })?
            .clone();

        info!("updating to {} via asset {}", release.tag_name, asset.name);

        let downloaded = self.downloader.download(&self.source, &asset).await?;
        let outcome = self.swapper.swap(&downloaded.file_path)?;

        info!(
            "update complete; previous binary at {}",
            outcome.previous.display()
        );
        Ok(())
    }

    /// Check, then update when a newer version exists
    ///
    /// Returns `Err` when the check fails and `Ok(())` when already up
    /// to date — callers wanting to tell a failed check from a
    /// confirmed no-op should call the two primitives separately.
    pub async fn check_and_update(&mut self) -> Result<()> {
        let report = self.check_latest().await;

        if let Some(error) = report.error {
            return Err(error);
        }
        if report.up_to_date {
            debug!("already up to date");
            return Ok(());
        }

        self.update().await
    }
}

/// Builder for [`Updater`]
///
/// Every field has a documented default; nothing is process-global.
///
/// | option | default |
/// |---|---|
/// | `http_client` | rustls client, redirects disabled, [`DEFAULT_TIMEOUT`] |
/// | `timeout` | [`DEFAULT_TIMEOUT`] (ignored with a custom client) |
/// | `api_url` | [`DEFAULT_API_URL`](crate::release::DEFAULT_API_URL) |
/// | `platform` | `{os}-{arch}` of the running process |
/// | `download_dir` | `std::env::temp_dir()` |
/// | `binary_path` | `std::env::current_exe()` at swap time |
/// | `launch_args` | none |
/// | `progress` | disabled |
pub struct UpdaterBuilder {
    owner: String,
    repo: String,
    current: Version,
    http_client: Option<reqwest::Client>,
    timeout: Duration,
    api_url: Option<String>,
    platform: Option<String>,
    download_dir: Option<PathBuf>,
    binary_path: Option<PathBuf>,
    launch_args: Vec<String>,
    show_progress: bool,
}

impl UpdaterBuilder {
    fn new(owner: impl Into<String>, repo: impl Into<String>, current: Version) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            current,
            http_client: None,
            timeout: DEFAULT_TIMEOUT,
            api_url: None,
            platform: None,
            download_dir: None,
            binary_path: None,
            launch_args: Vec::new(),
            show_progress: false,
        }
    }

    /// Supply the HTTP client used for all release source traffic
    ///
    /// The client should disable redirect following; otherwise asset
    /// downloads served via redirect are followed silently instead of
    /// failing fast.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Deadline for release source requests (default
    /// [`DEFAULT_TIMEOUT`]); ignored when a custom client is supplied
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the release source API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Override the platform string used for asset selection
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Override the directory assets are downloaded into
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Override the executable path to replace (default: the current
    /// process image)
    pub fn with_binary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary_path = Some(path.into());
        self
    }

    /// Arguments for the verification relaunch (default: none)
    pub fn with_launch_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launch_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Show a progress bar while downloading (default: off)
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Build the updater
    pub fn build(self) -> Result<Updater> {
        let client = match self.http_client {
            Some(client) => client,
            None => default_client(self.timeout)?,
        };

        let mut source = ReleaseClient::with_client(self.owner, self.repo, client);
        if let Some(api_url) = self.api_url {
            source = source.with_api_url(api_url);
        }

        let platform = self.platform.unwrap_or_else(default_platform);

        let mut downloader = AssetDownloader::new().with_progress(self.show_progress);
        if let Some(dir) = self.download_dir {
            downloader = downloader.with_dest_dir(dir);
        }

        let mut swapper = BinarySwapper::new().with_launch_args(self.launch_args);
        if let Some(path) = self.binary_path {
            swapper = swapper.with_binary_path(path);
        }

        debug!(
            "updater initialized: current={} platform={}",
            self.current, platform
        );

        Ok(Updater {
            current: self.current,
            platform,
            source,
            downloader,
            swapper,
            latest: None,
        })
    }
}

/// `{os}-{arch}` for the running process, with the architecture
/// spelled the way release pipelines commonly name assets (`amd64`,
/// `arm64`)
pub fn default_platform() -> String {
    format!("{}-{}", std::env::consts::OS, arch_token())
}

fn arch_token() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => other,
    }
}
