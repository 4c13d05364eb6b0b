//! Test fixtures: backend responses and a wiremock stand-in for the conversion server

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tubefetch::core::config::ClientConfig;
use tubefetch::download::models::{FormatOption, VideoMetadata};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VIDEO_URL: &str = "https://youtu.be/abc123";

/// Metadata body the way the backend serializes it.
pub fn sample_info_json() -> Value {
    json!({
        "title": "Never Gonna Give You Up",
        "channel": "Rick Astley",
        "duration": 212,
        "view_count": 1_500_000_000u64,
        "thumbnail": "https://i.ytimg.com/vi/abc123/hqdefault.jpg",
        "formats": [
            {"quality": "1080p", "ext": "mp4", "filesize": 0, "format_id": "137", "has_audio": false, "height": 1080},
            {"quality": "720p", "ext": "mp4", "filesize": 52_428_800, "format_id": "22", "has_audio": true, "height": 720},
            {"quality": "360p", "ext": "mp4", "filesize": null, "format_id": "18", "has_audio": true, "height": 360}
        ]
    })
}

pub fn sample_metadata(title: &str, formats: Vec<FormatOption>) -> VideoMetadata {
    VideoMetadata {
        title: title.to_string(),
        channel: "Test Channel".to_string(),
        duration: Some(212),
        view_count: Some(42),
        thumbnail: String::new(),
        formats,
    }
}

/// Client config pointed at `backend_url`, saving into `dir`.
pub fn test_config(backend_url: &str, dir: &Path) -> ClientConfig {
    ClientConfig {
        backend_url: backend_url.to_string(),
        download_dir: dir.to_path_buf(),
        request_timeout: Duration::from_secs(10),
    }
}

/// Mock conversion backend
///
/// # Example
/// ```ignore
/// let server = BackendServer::start().await;
/// server.mount_info(ResponseTemplate::new(200).set_body_json(sample_info_json())).await;
/// let backend = HttpBackend::new(&test_config(&server.uri(), dir.path()))?;
/// ```
pub struct BackendServer {
    pub server: MockServer,
}

impl BackendServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub async fn mount_info(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/api/video-info"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_download(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/api/download"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// `{"error": message}` with the given status, like the backend's error handler.
    pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
        ResponseTemplate::new(status).set_body_json(json!({ "error": message }))
    }
}
