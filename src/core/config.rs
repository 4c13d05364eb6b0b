use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the client
/// Backend base URL
/// Read once at startup from TUBEFETCH_BACKEND_URL environment variable
/// Default: http://localhost:5000 (the Flask backend's default port)
pub static BACKEND_URL: Lazy<String> = Lazy::new(|| {
    env::var("TUBEFETCH_BACKEND_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
});

/// Download folder path
/// Read from TUBEFETCH_DOWNLOAD_DIR environment variable
/// Supports tilde (~) expansion for home directory
/// Default: ~/Downloads
pub static DOWNLOAD_DIR: Lazy<String> =
    Lazy::new(|| env::var("TUBEFETCH_DOWNLOAD_DIR").unwrap_or_else(|_| "~/Downloads".to_string()));

/// Whole-request deadline for backend calls (in seconds)
/// Read from TUBEFETCH_REQUEST_TIMEOUT_SECS; invalid values fall back to the default
pub static REQUEST_TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
    env::var("TUBEFETCH_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(network::DEFAULT_REQUEST_TIMEOUT_SECS)
});

/// Notice display configuration
pub mod notice {
    use super::Duration;

    /// How long an error notice stays visible (in seconds)
    pub const ERROR_DISMISS_SECS: u64 = 5;

    /// Error notice display duration
    pub fn error_dismiss() -> Duration {
        Duration::from_secs(ERROR_DISMISS_SECS)
    }
}

/// Progress panel configuration
pub mod progress {
    use super::Duration;

    /// Delay before hiding the progress panel after a completed download (in seconds)
    pub const HIDE_DELAY_SECS: u64 = 3;

    /// Progress hide delay duration
    pub fn hide_delay() -> Duration {
        Duration::from_secs(HIDE_DELAY_SECS)
    }
}

/// Fallback filename configuration
pub mod filename {
    /// Title characters kept when the backend sends no filename hint
    pub const TITLE_MAX_CHARS: usize = 50;

    /// Extension for audio downloads (the backend converts to MP3)
    pub const AUDIO_EXT: &str = "mp3";

    /// Extension for video downloads (the backend merges to MP4)
    pub const VIDEO_EXT: &str = "mp4";
}

/// Quality selector configuration
pub mod quality {
    /// Option synthesized when the backend reports no formats (the backend's own default)
    pub const FALLBACK_QUALITY: &str = "720p";

    /// Label of the synthesized option
    pub const FALLBACK_LABEL: &str = "720p (Default)";
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Default whole-request timeout (in seconds)
    /// Generous because the backend converts the whole file before the first byte
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Connection timeout (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}

/// Values for one run, taken from the environment and optionally overridden from the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub download_dir: PathBuf,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Builds the config from the environment statics.
    pub fn from_env() -> Self {
        Self {
            backend_url: BACKEND_URL.clone(),
            download_dir: expand_dir(&DOWNLOAD_DIR),
            request_timeout: Duration::from_secs(*REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_backend_url(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        self
    }

    pub fn with_download_dir(mut self, dir: Option<String>) -> Self {
        if let Some(dir) = dir {
            self.download_dir = expand_dir(&dir);
        }
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Tilde-expands a directory path.
fn expand_dir(dir: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(dir).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_durations() {
        assert_eq!(notice::error_dismiss(), Duration::from_secs(5));
        assert_eq!(progress::hide_delay(), Duration::from_secs(3));
        assert_eq!(network::connect_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig {
            backend_url: "http://localhost:5000".to_string(),
            download_dir: PathBuf::from("."),
            request_timeout: Duration::from_secs(10),
        }
        .with_backend_url(Some("http://backend:8080".to_string()))
        .with_download_dir(Some("/tmp/videos".to_string()));

        assert_eq!(config.backend_url, "http://backend:8080");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/videos"));
    }

    #[test]
    fn test_overrides_none_keeps_values() {
        let config = ClientConfig {
            backend_url: "http://a".to_string(),
            download_dir: PathBuf::from("dir"),
            request_timeout: Duration::from_secs(1),
        };
        let same = config.clone().with_backend_url(None).with_download_dir(None);
        assert_eq!(config, same);
    }

    #[test]
    fn test_expand_dir_absolute_untouched() {
        assert_eq!(expand_dir("/srv/videos"), PathBuf::from("/srv/videos"));
    }
}
