//! HTTP fetching and attachment download.
//!
//! This module owns every network call the pipeline makes: the page fetch
//! used by link discovery and the per-attachment downloads.
//!
//! # Features
//!
//! - One bounded timeout per request (10s by default), no retries
//! - Streaming downloads written straight to disk
//! - File names taken from the URL's last path segment, overwriting on re-run
//! - Per-file failures logged and skipped by [`download_all`]
//!
//! # Example
//!
//! ```no_run
//! use anexos_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let file_path = client
//!     .download_to_file("https://example.com/Anexo_I.pdf", Path::new("./downloads"))
//!     .await?;
//! println!("Downloaded: {}", file_path.display());
//! # Ok(())
//! # }
//! ```

mod batch;
mod client;
mod constants;
mod error;
mod filename;

pub use batch::{DownloadedFile, download_all};
pub use client::HttpClient;
pub use constants::{DEFAULT_TIMEOUT_SECS, FALLBACK_FILENAME, MAX_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::filename_from_url;
