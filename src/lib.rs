//! Self-update for executables backed by GitHub-style releases
//!
//! Provides:
//! - Latest-version checking against a release source
//! - Platform-specific asset selection and streaming download
//! - Atomic binary replacement with a verification relaunch
//! - Automatic rollback when the new binary fails to launch
//!
//! The flow is driven by [`Updater`]: [`Updater::check_latest`] asks
//! the release source for the newest tag and compares it against the
//! running version; [`Updater::update`] downloads the matching
//! platform asset and swaps it into the executable path, keeping the
//! previous binary at `{path}-old`; [`Updater::check_and_update`]
//! chains the two.
//!
//! # Example
//!
//! ```no_run
//! use semver::Version;
//! use updraft::Updater;
//!
//! #[tokio::main]
//! async fn main() -> updraft::Result<()> {
//!     let mut updater = Updater::builder("acme", "widget", Version::new(1, 2, 3)).build()?;
//!
//!     let report = updater.check_latest().await;
//!     if report.error.is_none() && !report.up_to_date {
//!         updater.update().await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod download;
pub mod error;
pub mod release;
pub mod swap;
pub mod updater;
pub mod version;

pub use download::{AssetDownloader, DownloadResult};
pub use error::{Result, RollbackReport, SwapStage, UpdateError};
pub use release::{Release, ReleaseAsset, ReleaseClient, DEFAULT_API_URL};
pub use swap::{BinarySwapper, SwapOutcome};
pub use updater::{default_platform, CheckReport, Updater, UpdaterBuilder, DEFAULT_TIMEOUT};
pub use version::{parse_tag, CheckPolicy};

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
