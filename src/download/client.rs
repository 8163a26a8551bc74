//! HTTP client wrapper for page fetches and attachment downloads.
//!
//! This module provides the `HttpClient` struct which applies one bounded
//! timeout to every request, streams attachment bodies to disk, and maps
//! transport failures and non-success statuses to [`DownloadError`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::DEFAULT_TIMEOUT_SECS;
use super::error::DownloadError;
use super::filename::filename_from_url;
use crate::user_agent;

/// HTTP client shared by link discovery and the download stage.
///
/// Created once per run and reused so requests to the same host share a
/// connection pool. Redirects are followed transparently.
///
/// # Example
///
/// ```no_run
/// use anexos_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let path = client
///     .download_to_file("https://example.com/Anexo_I.pdf", Path::new("./downloads"))
///     .await?;
/// println!("Downloaded to: {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with the default 10 second timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client bounding each request by `timeout`.
    ///
    /// The same bound applies to connection setup and to the whole request.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = build_client(timeout)
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches a page and returns its body as text.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails or
    /// times out, or the server answers with a non-success status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        debug!("fetching page");
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.send_get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        debug!(bytes = body.len(), "page fetched");
        Ok(body)
    }

    /// Downloads a file from URL into `output_dir`.
    ///
    /// The file name is the URL's last path segment. An existing file with
    /// the same name is truncated and overwritten.
    ///
    /// # Returns
    ///
    /// The path to the downloaded file.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Writing to disk fails
    #[must_use = "download result contains the path to the downloaded file"]
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download_to_file(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        debug!("starting download");

        let parsed_url = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        let file_path = output_dir.join(filename_from_url(&parsed_url));

        // Request first so a failed fetch never truncates a previous copy.
        let response = self.send_get(url).await?;

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let stream_result = stream_to_file(&mut file, response, url, &file_path).await;
        if stream_result.is_err() {
            debug!(path = %file_path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&file_path).await;
        }
        let bytes_written = stream_result?;

        info!(
            path = %file_path.display(),
            bytes = bytes_written,
            "download complete"
        );

        Ok(file_path)
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Streams response body to file, returning bytes written.
///
/// Kept separate so the caller can remove the partial file on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_transport(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
        .build()
}
