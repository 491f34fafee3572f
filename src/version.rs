//! Version tag parsing and comparison

use semver::Version;

use crate::error::{Result, UpdateError};

/// Parse a release tag into a semantic version
///
/// Tags may carry a leading `v` prefix (`v1.2.3`), which is stripped
/// before parsing. Anything that then fails strict semver parsing is
/// reported as [`UpdateError::InvalidTag`], never coerced.
pub fn parse_tag(tag: &str) -> Result<Version> {
    let trimmed = tag.strip_prefix('v').unwrap_or(tag);
    Version::parse(trimmed).map_err(|source| UpdateError::InvalidTag {
        tag: tag.to_string(),
        source,
    })
}

/// Policy deciding when the current version counts as up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckPolicy {
    /// Up to date when the remote version is no newer than the current
    /// one. The default, and the forgiving choice: a remote downgrade
    /// never triggers an update.
    #[default]
    AtLeast,
    /// Up to date only when the versions are exactly equal. Any
    /// difference, including a remote downgrade, reports an update.
    Exact,
}

impl CheckPolicy {
    /// Apply the policy to a current/remote version pair
    pub fn up_to_date(self, current: &Version, remote: &Version) -> bool {
        match self {
            Self::AtLeast => remote <= current,
            Self::Exact => remote == current,
        }
    }
}
