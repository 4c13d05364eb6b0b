//! Human-readable formatting for sizes, durations and view counts.

/// Shown when a format's size is not known before the download starts.
pub const UNKNOWN_SIZE: &str = "Unknown (will be calculated during download)";

/// Shown when the backend did not report a duration.
pub const UNKNOWN_DURATION: &str = "Unknown";

/// Shown when the backend did not report a view count.
pub const UNKNOWN_VIEWS: &str = "Unknown views";

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with binary prefixes and two decimals.
///
/// Divides by 1024 until the value is under 1024 or the units run out, so very large
/// values stay in GB. `None` and `Some(0)` mean "unknown".
///
/// # Example
///
/// ```
/// use tubefetch::core::utils::format_file_size;
///
/// assert_eq!(format_file_size(Some(1536)), "1.50 KB");
/// assert_eq!(format_file_size(Some(1_073_741_824)), "1.00 GB");
/// assert_eq!(format_file_size(None), "Unknown (will be calculated during download)");
/// ```
pub fn format_file_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(bytes) if bytes > 0 => format_bytes(bytes),
        _ => UNKNOWN_SIZE.to_string(),
    }
}

/// Same scale as [`format_file_size`] without the "unknown" fallback; zero is "0.00 B".
pub fn format_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, SIZE_UNITS[unit])
}

/// Formats seconds as `M:SS` or `H:MM:SS`.
///
/// # Example
///
/// ```
/// use tubefetch::core::utils::format_duration;
///
/// assert_eq!(format_duration(Some(65)), "1:05");
/// assert_eq!(format_duration(Some(3725)), "1:02:05");
/// assert_eq!(format_duration(Some(0)), "Unknown");
/// ```
pub fn format_duration(seconds: Option<u64>) -> String {
    let seconds = match seconds {
        Some(s) if s > 0 => s,
        _ => return UNKNOWN_DURATION.to_string(),
    };

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Formats a view count with K/M suffixes.
pub fn format_view_count(count: Option<u64>) -> String {
    match count {
        Some(c) if c >= 1_000_000 => format!("{:.1}M views", c as f64 / 1_000_000.0),
        Some(c) if c >= 1_000 => format!("{:.1}K views", c as f64 / 1_000.0),
        Some(c) if c > 0 => format!("{} views", c),
        _ => UNKNOWN_VIEWS.to_string(),
    }
}

/// Truncates to at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
