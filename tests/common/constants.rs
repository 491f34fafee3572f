//! Shared constants for test infrastructure

// Repository identity used by all mocked endpoints
pub const OWNER: &str = "acme";
pub const REPO: &str = "widget";

// Version constants
pub const VERSION_1_2_3: &str = "1.2.3";
pub const VERSION_1_3_0: &str = "1.3.0";

// Tag constants (with 'v' prefix)
pub const TAG_V1_2_3: &str = "v1.2.3";
pub const TAG_V1_3_0: &str = "v1.3.0";

// Platform strings ({os}-{arch})
pub const PLATFORM_LINUX_AMD64: &str = "linux-amd64";
pub const PLATFORM_DARWIN_ARM64: &str = "darwin-arm64";
pub const PLATFORM_WINDOWS_AMD64: &str = "windows-amd64";

// Asset identifiers
pub const ASSET_ID_LINUX: u64 = 101;
pub const ASSET_ID_DARWIN: u64 = 102;

// Binary content for testing
pub const ORIGINAL_CONTENT: &[u8] = b"original binary content";
pub const FAKE_BINARY_CONTENT: &[u8] = b"fake binary content for testing";
