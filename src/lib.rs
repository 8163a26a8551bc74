//! Anexos Core Library
//!
//! This library collects the PDF attachments published on a web page,
//! turns their tables into one delimited file, and packages the results
//! into ZIP archives.
//!
//! # Architecture
//!
//! The library is organized into the following modules, one per stage:
//! - [`discovery`] - Anchor scanning and attachment link selection
//! - [`download`] - HTTP client and sequential batch download
//! - [`extract`] - Table extraction, abbreviation expansion, delimited output
//! - [`package`] - Flat ZIP archive creation
//! - [`pipeline`] - Stage orchestration and run report

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod discovery;
pub mod download;
pub mod extract;
pub mod package;
pub mod pipeline;
mod user_agent;

// Re-export commonly used types
pub use discovery::{DiscoveryError, MarkerRule, PdfLink, discover_links, extract_pdf_links};
pub use download::{DownloadError, DownloadedFile, HttpClient, download_all};
pub use extract::{
    AbbreviationMap, AbbreviationPreset, ExtractError, ExtractedTable, TableExtractor,
    UnpdfExtractor, extract_all, write_delimited,
};
pub use package::{PackageError, PackageOutcome, create_zip};
pub use pipeline::{
    ExtractionConfig, Pipeline, PipelineConfig, PipelineReport, RunOutcome, TableSummary,
};
