//! Link discovery: find attachment PDFs linked from an HTML page.
//!
//! An anchor is selected when its destination path ends with `.pdf` and the
//! configured [`MarkerRule`] accepts it. Relative destinations are resolved
//! against the page URL; results keep document order and duplicates.

mod marker;

use std::fmt;

use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use crate::download::{DownloadError, HttpClient};

pub use marker::{MarkerRule, ParseMarkerRuleError, TEXT_MARKER, URL_MARKERS};

/// Absolute URL of a remote PDF attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfLink(Url);

impl PdfLink {
    /// Wraps an already resolved URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    /// Parses an absolute URL string.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `url` is not an absolute URL.
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self)
    }

    /// The URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The parsed URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for PdfLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that stop link discovery before any anchor is inspected.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The configured page URL is not an absolute URL.
    #[error("invalid page URL: {url}")]
    InvalidPageUrl {
        /// The rejected URL string.
        url: String,
    },

    /// The page could not be fetched.
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] DownloadError),
}

/// Fetches `page_url` and returns the attachment links it contains.
///
/// # Errors
///
/// Returns `DiscoveryError` if the page URL is invalid or the page cannot be
/// fetched (transport failure, timeout, non-2xx status). An empty `Ok` means
/// the page was fetched but no anchor matched.
#[instrument(skip(client), fields(url = %page_url))]
pub async fn discover_links(
    client: &HttpClient,
    page_url: &str,
    rule: MarkerRule,
) -> Result<Vec<PdfLink>, DiscoveryError> {
    let base = Url::parse(page_url).map_err(|_| DiscoveryError::InvalidPageUrl {
        url: page_url.to_string(),
    })?;

    let html = client.fetch_text(page_url).await?;
    let links = extract_pdf_links(&html, &base, rule);

    info!(links = links.len(), "link discovery finished");
    Ok(links)
}

/// Selects attachment links from an HTML document.
///
/// Pure function over the document text; see the module docs for the rules.
#[must_use]
pub fn extract_pdf_links(html: &str, base: &Url, rule: MarkerRule) -> Vec<PdfLink> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_href(base, href) else {
            debug!(href, "skipping unresolvable link");
            continue;
        };
        if !url.path().ends_with(".pdf") {
            continue;
        }

        let text: String = anchor.text().collect();
        if rule.matches(&text, url.path()) {
            debug!(url = %url, "matched attachment link");
            links.push(PdfLink(url));
        }
    }
    links
}

/// Resolves `href` against `base`, keeping only HTTP(S) destinations.
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let url = base.join(href.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
