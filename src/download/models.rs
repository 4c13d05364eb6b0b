// Data models shared by the backend client and the session controller

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::config;

/// Download type: full video (container with audio) or extracted audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Video,
    Audio,
}

impl FormatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    /// Extension used when the backend does not name the file.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Video => config::filename::VIDEO_EXT,
            Self::Audio => config::filename::AUDIO_EXT,
        }
    }

    /// Audio downloads have no quality dimension.
    pub fn has_quality(&self) -> bool {
        matches!(self, Self::Video)
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" | "mp4" => Ok(Self::Video),
            "audio" | "mp3" => Ok(Self::Audio),
            other => Err(format!("unknown format '{}', expected video or audio", other)),
        }
    }
}

/// One downloadable quality tier as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOption {
    /// Quality label, e.g. "720p"; unique within one metadata response
    pub quality: String,
    /// Container extension
    #[serde(default = "default_ext")]
    pub ext: String,
    /// Size in bytes; 0 means unknown until download
    #[serde(default, deserialize_with = "count_or_zero")]
    pub filesize: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_audio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl FormatOption {
    pub fn new(quality: impl Into<String>, ext: impl Into<String>, filesize: u64) -> Self {
        Self {
            quality: quality.into(),
            ext: ext.into(),
            filesize,
            format_id: None,
            has_audio: None,
            height: None,
        }
    }

    /// Size in bytes if the backend knew it.
    pub fn known_size(&self) -> Option<u64> {
        (self.filesize > 0).then_some(self.filesize)
    }
}

/// Metadata for one video, replaced wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVideoMetadata")]
pub struct VideoMetadata {
    pub title: String,
    pub channel: String,
    /// Seconds; `None` when unknown
    pub duration: Option<u64>,
    pub view_count: Option<u64>,
    pub thumbnail: String,
    /// In backend order (highest resolution first)
    pub formats: Vec<FormatOption>,
}

impl VideoMetadata {
    /// Looks up a format by its quality label.
    pub fn find_format(&self, quality: &str) -> Option<&FormatOption> {
        self.formats.iter().find(|f| f.quality == quality)
    }
}

/// Wire shape: every field may be missing or `null`.
#[derive(Deserialize)]
struct RawVideoMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default, deserialize_with = "optional_count")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "optional_count")]
    view_count: Option<u64>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    formats: Option<Vec<FormatOption>>,
}

impl From<RawVideoMetadata> for VideoMetadata {
    fn from(raw: RawVideoMetadata) -> Self {
        Self {
            title: raw.title.unwrap_or_else(|| "Unknown Title".to_string()),
            channel: raw.channel.unwrap_or_else(|| "Unknown Channel".to_string()),
            duration: raw.duration.filter(|d| *d > 0),
            view_count: raw.view_count.filter(|v| *v > 0),
            thumbnail: raw.thumbnail.unwrap_or_default(),
            formats: raw.formats.unwrap_or_default(),
        }
    }
}

fn default_ext() -> String {
    config::filename::VIDEO_EXT.to_string()
}

/// Accepts integers, floats (truncated) and `null`; negative or non-finite values are unknown.
fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|n| {
        n.as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
    }))
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_count(deserializer)?.unwrap_or(0))
}

/// Body of a download call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format: FormatKind,
    /// Sent as the selector shows it, even for audio
    pub quality: String,
}

/// Body of a metadata call.
#[derive(Debug, Clone, Serialize)]
pub struct InfoRequest<'a> {
    pub url: &'a str,
}

/// Opaque file content returned by a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    pub bytes: Bytes,
    /// Filename suggested by the backend (Content-Disposition)
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_backend_response() {
        let json = r#"{
            "title": "Never Gonna Give You Up",
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hq.jpg",
            "duration": 212,
            "channel": "Rick Astley",
            "view_count": 1500000000,
            "formats": [
                {"format_id": "137", "quality": "1080p", "ext": "mp4", "filesize": 104857600,
                 "filesize_mb": 100.0, "has_audio": false, "height": 1080},
                {"format_id": "18", "quality": "360p", "ext": "mp4", "filesize": 0,
                 "filesize_mb": 0, "has_audio": true, "height": 360}
            ]
        }"#;

        let meta: VideoMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.title, "Never Gonna Give You Up");
        assert_eq!(meta.channel, "Rick Astley");
        assert_eq!(meta.duration, Some(212));
        assert_eq!(meta.view_count, Some(1_500_000_000));
        assert_eq!(meta.formats.len(), 2);
        assert_eq!(meta.formats[0].quality, "1080p");
        assert_eq!(meta.formats[0].known_size(), Some(104_857_600));
        assert_eq!(meta.formats[0].height, Some(1080));
        assert_eq!(meta.formats[1].known_size(), None);
        assert_eq!(meta.formats[1].has_audio, Some(true));
    }

    #[test]
    fn test_parse_sparse_response() {
        let json = r#"{"title": null, "duration": 93.7, "view_count": null, "formats": [{"quality": "480p", "filesize": null}]}"#;

        let meta: VideoMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.title, "Unknown Title");
        assert_eq!(meta.channel, "Unknown Channel");
        assert_eq!(meta.duration, Some(93));
        assert_eq!(meta.view_count, None);
        assert_eq!(meta.thumbnail, "");
        assert_eq!(meta.formats, vec![FormatOption::new("480p", "mp4", 0)]);
    }

    #[test]
    fn test_zero_and_negative_counts_are_unknown() {
        let json = r#"{"duration": 0, "view_count": -5}"#;
        let meta: VideoMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.duration, None);
        assert_eq!(meta.view_count, None);
        assert!(meta.formats.is_empty());
    }

    #[test]
    fn test_find_format() {
        let meta = VideoMetadata {
            title: "t".to_string(),
            channel: "c".to_string(),
            duration: None,
            view_count: None,
            thumbnail: String::new(),
            formats: vec![FormatOption::new("720p", "mp4", 10), FormatOption::new("360p", "webm", 0)],
        };
        assert_eq!(meta.find_format("360p").map(|f| f.ext.as_str()), Some("webm"));
        assert!(meta.find_format("4320p").is_none());
    }

    #[test]
    fn test_download_request_body() {
        let request = DownloadRequest {
            url: "https://youtu.be/abc123".to_string(),
            format: FormatKind::Audio,
            quality: "720p".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"url": "https://youtu.be/abc123", "format": "audio", "quality": "720p"})
        );
    }

    #[test]
    fn test_format_kind_parse() {
        assert_eq!("video".parse::<FormatKind>(), Ok(FormatKind::Video));
        assert_eq!(" Audio ".parse::<FormatKind>(), Ok(FormatKind::Audio));
        assert_eq!("mp3".parse::<FormatKind>(), Ok(FormatKind::Audio));
        assert!("flac".parse::<FormatKind>().is_err());
        assert_eq!(FormatKind::Audio.extension(), "mp3");
        assert_eq!(FormatKind::Video.extension(), "mp4");
    }
}
