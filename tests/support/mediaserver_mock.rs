//! wiremock scaffolding that mimics the MediaServer `api/v2` endpoints.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts `GET /api/v2/` answering `{"success": true}`.
pub async fn mount_health(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(server)
        .await;
}

/// Mounts `channels/get/` for `oid`.
pub async fn mount_channel(server: &MockServer, oid: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/get/"))
        .and(query_param("oid", oid))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "info": {"oid": oid, "title": title}
        })))
        .mount(server)
        .await;
}

/// Mounts a `channels/get/` rejection for `oid`.
pub async fn mount_missing_channel(server: &MockServer, oid: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/get/"))
        .and(query_param("oid", oid))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Channel not found"
        })))
        .mount(server)
        .await;
}

/// Mounts `channels/content/` for `parent_oid` with the given lists.
pub async fn mount_content(server: &MockServer, parent_oid: &str, content: Value) {
    let mut body = content;
    body["success"] = json!(true);
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/content/"))
        .and(query_param("parent_oid", parent_oid))
        .and(query_param("content", "cvp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts `medias/resources-list/` for `oid`.
pub async fn mount_resources(server: &MockServer, oid: &str, resources: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v2/medias/resources-list/"))
        .and(query_param("oid", oid))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "resources": resources
        })))
        .mount(server)
        .await;
}

/// Mounts `download/` for `oid` and `locator`, answering with `direct_url`.
pub async fn mount_download(server: &MockServer, oid: &str, locator: &str, direct_url: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v2/download/"))
        .and(query_param("oid", oid))
        .and(query_param("url", locator))
        .and(query_param("redirect", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "url": direct_url
        })))
        .mount(server)
        .await;
}

/// Writes a client configuration pointing at `server_uri`.
pub fn write_config(dir: &Path, server_uri: &str) -> PathBuf {
    let config_path = dir.join("msc.json");
    let config = json!({
        "SERVER_URL": server_uri,
        "API_KEY": "test-key",
        "TIMEOUT": 5,
        "VERIFY_SSL": false
    });
    std::fs::write(&config_path, config.to_string()).expect("failed to write config");
    config_path
}
