//! Error types for updraft

use std::fmt;

use thiserror::Error;

/// Result type alias using updraft's error type
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Errors produced by the update pipeline
///
/// Each variant maps to one stage of the flow so callers can tell a
/// failed release lookup apart from a failed download or a failed
/// binary swap. Nothing here retries; every failure is surfaced to the
/// caller immediately.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Network failure reaching the release source
    #[error("release source request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The release source answered with a non-success status
    #[error("release source returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// A release tag that does not parse as a semantic version
    #[error("invalid version tag {tag:?}: {source}")]
    InvalidTag {
        tag: String,
        #[source]
        source: semver::Error,
    },

    /// No release asset name contains the platform string
    #[error("no release asset matches platform {platform:?}")]
    AssetNotFound { platform: String },

    /// I/O failure while fetching or writing an asset
    #[error("download of {asset:?} failed: {message}")]
    Download { asset: String, message: String },

    /// The asset endpoint answered with a redirect
    ///
    /// Following redirects is deliberately unimplemented; see
    /// [`AssetDownloader`](crate::download::AssetDownloader).
    #[error("asset download redirected to {location:?}: redirect handling not implemented")]
    RedirectNotSupported { location: String },

    /// Rename or permission failure while installing the new binary
    #[error("binary swap failed while {stage}: {source}")]
    Swap {
        stage: SwapStage,
        #[source]
        source: std::io::Error,
    },

    /// The relaunched binary failed to start or exited non-zero
    #[error("launch of new binary failed: {message}")]
    Launch { message: String },

    /// A failed verification launch triggered rollback
    ///
    /// Carries both the launch failure and the outcome of the rollback
    /// itself; neither masks the other.
    #[error("{launch}; {rollback}")]
    RolledBack {
        launch: Box<UpdateError>,
        rollback: RollbackReport,
    },
}

impl UpdateError {
    /// Create a download error for a named asset
    pub(crate) fn download(asset: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Download {
            asset: asset.into(),
            message: message.to_string(),
        }
    }

    /// Create a launch error
    pub(crate) fn launch(message: impl fmt::Display) -> Self {
        Self::Launch {
            message: message.to_string(),
        }
    }
}

/// Stage of the binary swap at which a rename or permission change failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStage {
    /// Resolving the path of the currently-running executable
    ResolveExecutable,
    /// Moving the current executable aside to `{path}-old`
    MoveAside,
    /// Moving the downloaded binary into the executable path
    Install,
    /// Setting execute permissions on the installed binary
    SetPermissions,
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ResolveExecutable => "resolving the current executable path",
            Self::MoveAside => "moving the current executable aside",
            Self::Install => "installing the new binary",
            Self::SetPermissions => "setting execute permissions",
        };
        f.write_str(s)
    }
}

/// Outcome of the two rollback sub-steps
///
/// Rollback removes the newly installed binary and renames the `-old`
/// copy back into place. Both sub-steps run even if the first fails,
/// and both failures are kept.
#[derive(Debug, Default)]
pub struct RollbackReport {
    /// Failure removing the newly installed binary, if any
    pub remove_new: Option<std::io::Error>,
    /// Failure renaming the `-old` binary back, if any
    pub restore_old: Option<std::io::Error>,
}

impl RollbackReport {
    /// Whether both rollback sub-steps completed
    pub fn succeeded(&self) -> bool {
        self.remove_new.is_none() && self.restore_old.is_none()
    }
}

impl fmt::Display for RollbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.succeeded() {
            return f.write_str("rollback restored the previous binary");
        }
        f.write_str("rollback incomplete:")?;
        if let Some(e) = &self.remove_new {
            write!(f, " failed to remove the new binary ({e})")?;
        }
        if let Some(e) = &self.restore_old {
            write!(f, " failed to restore the old binary ({e})")?;
        }
        Ok(())
    }
}
