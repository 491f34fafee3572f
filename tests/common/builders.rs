//! Builder patterns for test data construction
//!
//! Fluent APIs for constructing Release and ReleaseAsset values with
//! sensible defaults for testing.

use updraft::{Release, ReleaseAsset};

use super::constants::*;

/// Builder for constructing Release values with test defaults
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    tag_name: String,
    name: Option<String>,
    prerelease: bool,
    published_at: Option<String>,
    assets: Vec<ReleaseAsset>,
}

impl ReleaseBuilder {
    pub fn new() -> Self {
        Self {
            tag_name: TAG_V1_2_3.to_string(),
            name: None,
            prerelease: false,
            published_at: None,
            assets: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag_name = tag.to_string();
        self
    }

    pub fn asset(mut self, asset: ReleaseAsset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Linux and macOS assets, in that listed order
    pub fn with_standard_assets(self) -> Self {
        self.asset(
            AssetBuilder::new()
                .id(ASSET_ID_LINUX)
                .name(&format!("widget_{}.tar.gz", PLATFORM_LINUX_AMD64))
                .build(),
        )
        .asset(
            AssetBuilder::new()
                .id(ASSET_ID_DARWIN)
                .name(&format!("widget_{}", PLATFORM_DARWIN_ARM64))
                .build(),
        )
    }

    pub fn build(self) -> Release {
        Release {
            tag_name: self.tag_name,
            name: self.name,
            prerelease: self.prerelease,
            published_at: self.published_at,
            assets: self.assets,
        }
    }
}

impl Default for ReleaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing ReleaseAsset values
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    id: u64,
    name: String,
    size: u64,
}

impl AssetBuilder {
    pub fn new() -> Self {
        Self {
            id: ASSET_ID_LINUX,
            name: String::new(),
            size: 0,
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn build(self) -> ReleaseAsset {
        ReleaseAsset {
            id: self.id,
            name: self.name,
            size: self.size,
        }
    }
}

impl Default for AssetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
