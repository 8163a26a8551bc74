//! Marker rules deciding whether a PDF link is an attachment link.

use std::fmt;
use std::str::FromStr;

/// Substring the text-marker rule looks for in the anchor's visible text.
pub const TEXT_MARKER: &str = "Anexo";

/// Substrings the URL-marker rule looks for in the lower-cased link path.
pub const URL_MARKERS: [&str; 2] = ["anexo-i", "anexo-ii"];

/// Predicate applied to anchors whose path already ends in `.pdf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerRule {
    /// Visible anchor text contains `Anexo` (case-sensitive).
    #[default]
    Text,
    /// Lower-cased link path contains `anexo-i` or `anexo-ii`.
    Url,
}

impl MarkerRule {
    /// Returns whether an anchor with `text` pointing at `path` is selected.
    #[must_use]
    pub fn matches(self, text: &str, path: &str) -> bool {
        match self {
            Self::Text => text.contains(TEXT_MARKER),
            Self::Url => {
                let lowered = path.to_lowercase();
                URL_MARKERS.iter().any(|marker| lowered.contains(marker))
            }
        }
    }

    /// Stable label used by the CLI and the config file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for MarkerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown marker rule label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown marker rule '{0}' (expected 'text' or 'url')")]
pub struct ParseMarkerRuleError(String);

impl FromStr for MarkerRule {
    type Err = ParseMarkerRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "url" => Ok(Self::Url),
            _ => Err(ParseMarkerRuleError(s.to_string())),
        }
    }
}
