//! Mock server helpers for release API testing
//!
//! Wiremock setups mirroring the release source endpoints the library
//! consumes: the latest-release lookup and the per-asset download.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// JSON body for a latest-release response with `(id, name)` assets
pub fn release_body(tag: &str, assets: &[(u64, &str)]) -> serde_json::Value {
    json!({
        "tag_name": tag,
        "prerelease": false,
        "assets": assets
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name, "size": 0 }))
            .collect::<Vec<_>>(),
    })
}

fn latest_release_path() -> String {
    format!("/repos/{OWNER}/{REPO}/releases/latest")
}

fn asset_path(id: u64) -> String {
    format!("/repos/{OWNER}/{REPO}/releases/assets/{id}")
}

/// Mount the latest-release endpoint
pub async fn mock_latest_release(server: &MockServer, tag: &str, assets: &[(u64, &str)]) {
    Mock::given(method("GET"))
        .and(path(latest_release_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(release_body(tag, assets)))
        .mount(server)
        .await;
}

/// Mount a latest-release endpoint that fails with the given status
pub async fn mock_latest_release_error(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(latest_release_path()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount an asset download endpoint returning the given content
pub async fn mock_asset_download(server: &MockServer, id: u64, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(asset_path(id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .mount(server)
        .await;
}

/// Mount an asset download endpoint answering with a redirect
pub async fn mock_asset_redirect(server: &MockServer, id: u64, location: &str) {
    Mock::given(method("GET"))
        .and(path(asset_path(id)))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", location))
        .mount(server)
        .await;
}

/// Mount an asset download endpoint that always fails with 500
pub async fn mock_failing_asset(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(asset_path(id)))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

/// Mount an asset download endpoint expected to receive zero requests
pub async fn mock_untouched_asset(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(asset_path(id)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}
