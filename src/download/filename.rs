//! Filename resolution for saved downloads.
//!
//! The backend names the file through `Content-Disposition`; when it does not, the
//! name is synthesized from the video title.

use crate::core::config;
use crate::core::utils::truncate_chars;
use crate::download::models::FormatKind;

/// Extract the filename from a `Content-Disposition` header value.
///
/// Understands `filename*=UTF-8''<percent-encoded>` (preferred), `filename="..."` and a
/// bare `filename=...`. Returns `None` when no usable name is present.
///
/// # Example
///
/// ```
/// use tubefetch::download::filename::parse_content_disposition;
///
/// assert_eq!(
///     parse_content_disposition(r#"attachment; filename="Song.mp3""#).as_deref(),
///     Some("Song.mp3")
/// );
/// assert_eq!(parse_content_disposition("inline"), None);
/// ```
pub fn parse_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(header) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => extended = decode_ext_value(value.trim()),
            "filename" => plain = Some(unquote(value.trim())),
            _ => {}
        }
    }

    extended.or(plain).filter(|name| !name.trim().is_empty())
}

/// Split header parameters on `;`, ignoring separators inside quoted strings.
fn split_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(header[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(header[start..].trim());
    params
}

/// Strip surrounding quotes and resolve `\x` escapes; bare tokens pass through.
fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"') else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            '"' => break,
            c => out.push(c),
        }
    }
    out
}

/// Decode an RFC 5987 value: `charset'lang'percent-encoded`.
fn decode_ext_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let _lang = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        return None;
    }
    urlencoding::decode(encoded).ok().map(|s| s.into_owned())
}

/// Name used when the backend sent no hint: `<title up to 50 chars>.<mp3|mp4>`.
///
/// # Example
///
/// ```
/// use tubefetch::download::filename::fallback_filename;
/// use tubefetch::download::models::FormatKind;
///
/// assert_eq!(fallback_filename("My Video", FormatKind::Audio), "My Video.mp3");
/// ```
pub fn fallback_filename(title: &str, kind: FormatKind) -> String {
    format!(
        "{}.{}",
        truncate_chars(title, config::filename::TITLE_MAX_CHARS),
        kind.extension()
    )
}

/// Backend hint if present, otherwise the synthesized name.
pub fn resolve_filename(hint: Option<&str>, title: &str, kind: FormatKind) -> String {
    hint.map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_filename(title, kind))
}
