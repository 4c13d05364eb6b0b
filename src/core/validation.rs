//! URL shape and filename validation utilities
//!
//! - YouTube URL shape check (runs before any network call)
//! - Filename sanitization (remove filesystem-unsafe characters)

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Accepted URL shape: optional scheme, optional `www.`, a YouTube host and a non-empty path.
static YOUTUBE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+$").expect("Failed to compile YouTube URL regex")
});

/// Longest filename `sanitize_filename` will return, in characters.
pub const MAX_FILENAME_CHARS: usize = 200;

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing left after trimming whitespace
    #[error("URL is required")]
    MissingUrl,

    /// Input does not look like a YouTube URL (the raw input is kept for logging)
    #[error("Invalid YouTube URL")]
    InvalidUrl(String),
}

/// Validates the shape of a YouTube URL and returns it trimmed.
///
/// This is a shape check only: it says nothing about whether the video exists or is
/// accessible. That is decided by the metadata fetch.
///
/// # Examples
/// ```
/// use tubefetch::core::validation::validate_youtube_url;
///
/// assert_eq!(validate_youtube_url("  https://youtu.be/abc123 ").unwrap(), "https://youtu.be/abc123");
/// assert!(validate_youtube_url("youtube.com/watch?v=abc").is_ok());
/// assert!(validate_youtube_url("https://evil.com/watch?v=abc").is_err());
/// assert!(validate_youtube_url("   ").is_err());
/// ```
pub fn validate_youtube_url(raw: &str) -> Result<&str, ValidationError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ValidationError::MissingUrl);
    }
    if !YOUTUBE_URL_REGEX.is_match(url) {
        return Err(ValidationError::InvalidUrl(url.to_string()));
    }
    Ok(url)
}

/// Sanitizes a filename by removing filesystem-unsafe characters.
///
/// Removes `< > : " / \ | ? *` and control characters, then caps the result at
/// [`MAX_FILENAME_CHARS`] characters.
///
/// # Examples
/// ```
/// use tubefetch::core::validation::sanitize_filename;
///
/// assert_eq!(sanitize_filename("video.mp4"), "video.mp4");
/// assert_eq!(sanitize_filename("AC/DC: Live?.mp4"), "ACDC Live.mp4");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !['<', '>', ':', '"', '/', '\\', '|', '?', '*'].contains(c))
        .filter(|c| !c.is_control())
        .take(MAX_FILENAME_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== validate_youtube_url Tests ====================

    #[test]
    fn test_validate_youtube_url_valid() {
        let valid_urls = vec![
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ",
            "www.youtube.com/shorts/abc",
            "https://www.youtube.com/playlist?list=PL123",
        ];

        for url in valid_urls {
            assert!(validate_youtube_url(url).is_ok(), "Expected valid: {}", url);
        }
    }

    #[test]
    fn test_validate_youtube_url_invalid() {
        let invalid_urls = vec![
            "https://evil.com/watch?v=dQw4w9WgXcQ",
            "ftp://youtube.com/video",
            "https://youtube.com/",
            "https://youtube.com",
            "https://m.youtube.com/watch?v=abc",
            "https://music.youtube.com/watch?v=abc",
            "https://youtube.com.evil.com/watch",
            "not a url",
        ];

        for url in invalid_urls {
            assert_eq!(
                validate_youtube_url(url),
                Err(ValidationError::InvalidUrl(url.to_string())),
                "Expected invalid: {}",
                url
            );
        }
    }

    #[test]
    fn test_validate_youtube_url_empty() {
        assert_eq!(validate_youtube_url(""), Err(ValidationError::MissingUrl));
        assert_eq!(validate_youtube_url(" \t\n"), Err(ValidationError::MissingUrl));
    }

    #[test]
    fn test_validate_youtube_url_trims() {
        assert_eq!(
            validate_youtube_url("\thttps://youtu.be/abc123  ").unwrap(),
            "https://youtu.be/abc123"
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::MissingUrl.to_string(), "URL is required");
        assert_eq!(
            ValidationError::InvalidUrl("x".to_string()).to_string(),
            "Invalid YouTube URL"
        );
    }

    // ==================== sanitize_filename Tests ====================

    #[test]
    fn test_sanitize_filename_strips_reserved() {
        assert_eq!(sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j.mp3"#), "abcdefghij.mp3");
    }

    #[test]
    fn test_sanitize_filename_strips_control() {
        assert_eq!(sanitize_filename("line\nbreak\t.mp4"), "linebreak.mp4");
    }

    #[test]
    fn test_sanitize_filename_length_cap() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_filename(&long).chars().count(), MAX_FILENAME_CHARS);
    }

    #[test]
    fn test_sanitize_filename_keeps_unicode() {
        assert_eq!(sanitize_filename("Песня — live.mp3"), "Песня — live.mp3");
    }
}
