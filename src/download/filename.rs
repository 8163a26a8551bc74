//! Filename derivation and sanitization for downloaded attachments.
//!
//! The saved name is always the URL's last path segment, so re-running the
//! tool overwrites the same file instead of accumulating numbered copies.

use std::path::{Component, Path};

use url::Url;

use super::constants::FALLBACK_FILENAME;

/// Derives the local file name from the URL's final path segment.
///
/// The segment is percent-decoded (`Anexo%20I.pdf` becomes `Anexo I.pdf`)
/// and sanitized. URLs ending in `/` fall back to [`FALLBACK_FILENAME`].
#[must_use]
pub fn filename_from_url(url: &Url) -> String {
    if let Some(mut segments) = url.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let decoded = urlencoding::decode(last)
            .map_or_else(|_| last.to_string(), std::borrow::Cow::into_owned);
        let sanitized = sanitize_filename(&decoded);
        if !sanitized.trim_matches('_').is_empty() {
            return sanitized;
        }
    }

    FALLBACK_FILENAME.to_string()
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
