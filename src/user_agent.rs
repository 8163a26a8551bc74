//! Shared User-Agent string for page and attachment requests.
//!
//! Page fetches and PDF downloads go through the same client, so a single
//! identifying string keeps the traffic recognizable for site operators.

/// Project URL for User-Agent identification (RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/anexos";

/// Default User-Agent for every request made by the tool.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("anexos/{version} (attachment-collector; +{PROJECT_UA_URL})")
}
