//! Sequential batch download of discovered attachments.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::client::HttpClient;
use super::error::DownloadError;
use crate::discovery::PdfLink;

/// A successfully saved attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    path: PathBuf,
    source_url: String,
}

impl DownloadedFile {
    /// Pairs a saved local path with the URL it came from.
    #[must_use]
    pub fn new(path: PathBuf, source_url: impl Into<String>) -> Self {
        Self {
            path,
            source_url: source_url.into(),
        }
    }

    /// Local path of the saved file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URL the file was downloaded from.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

/// Downloads every link into `output_dir`, one after another.
///
/// The directory is created if missing. A failed link is logged and skipped;
/// it never aborts the batch. The result keeps input order and only holds
/// files that were actually saved.
///
/// # Errors
///
/// Returns `DownloadError::Io` only when `output_dir` cannot be created.
pub async fn download_all(
    client: &HttpClient,
    links: &[PdfLink],
    output_dir: &Path,
) -> Result<Vec<DownloadedFile>, DownloadError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| DownloadError::io(output_dir, e))?;

    let mut downloaded = Vec::with_capacity(links.len());
    for link in links {
        match client.download_to_file(link.as_str(), output_dir).await {
            Ok(path) => downloaded.push(DownloadedFile::new(path, link.as_str())),
            Err(error) => warn!(url = %link, error = %error, "download failed, skipping"),
        }
    }

    info!(
        requested = links.len(),
        saved = downloaded.len(),
        failed = links.len() - downloaded.len(),
        "download batch finished"
    );
    Ok(downloaded)
}
