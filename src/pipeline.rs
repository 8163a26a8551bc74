//! End-to-end run: discovery, download, extraction, packaging.
//!
//! Each stage consumes the complete output of the previous one. Failures are
//! handled where they happen and logged; [`Pipeline::run`] always returns a
//! [`PipelineReport`] rather than an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::discovery::{self, MarkerRule, PdfLink};
use crate::download::{self, DownloadedFile, HttpClient};
use crate::extract::{self, AbbreviationMap, TableExtractor};
use crate::package::{self, PackageOutcome};

/// Page listing the procedure-list attachments.
pub const DEFAULT_PAGE_URL: &str = "https://www.gov.br/ans/pt-br/acesso-a-informacao/participacao-da-sociedade/atualizacao-do-rol-de-procedimentos";

/// Directory receiving downloads and archives.
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

/// Archive holding the downloaded PDFs.
pub const PDF_ARCHIVE_NAME: &str = "anexos.zip";

/// Delimited file holding the extracted table.
pub const TABLE_FILE_NAME: &str = "rol_de_procedimentos.csv";

/// Archive holding the extracted table file.
pub const TABLE_ARCHIVE_NAME: &str = "rol_de_procedimentos.zip";

/// Settings for the table stage.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Output path of the delimited table file.
    pub table_path: PathBuf,
    /// Archive path for the table file.
    pub table_archive: PathBuf,
    /// Code expansion applied to the combined table.
    pub abbreviations: AbbreviationMap,
    /// Field delimiter of the table file.
    pub delimiter: u8,
}

impl ExtractionConfig {
    /// Default table paths inside `download_dir`.
    #[must_use]
    pub fn in_dir(download_dir: &Path, abbreviations: AbbreviationMap) -> Self {
        Self {
            table_path: download_dir.join(TABLE_FILE_NAME),
            table_archive: download_dir.join(TABLE_ARCHIVE_NAME),
            abbreviations,
            delimiter: b',',
        }
    }
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Page scanned for attachment links.
    pub page_url: String,
    /// Rule selecting attachment links among PDF links.
    pub marker_rule: MarkerRule,
    /// Directory receiving the downloaded PDFs.
    pub download_dir: PathBuf,
    /// Archive path for the downloaded PDFs.
    pub pdf_archive: PathBuf,
    /// Table stage settings; `None` skips extraction.
    pub extraction: Option<ExtractionConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::with_download_dir(PathBuf::from(DEFAULT_DOWNLOAD_DIR))
    }
}

impl PipelineConfig {
    /// Default settings with every output placed in `download_dir`.
    #[must_use]
    pub fn with_download_dir(download_dir: PathBuf) -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            marker_rule: MarkerRule::default(),
            pdf_archive: download_dir.join(PDF_ARCHIVE_NAME),
            extraction: Some(ExtractionConfig::in_dir(
                &download_dir,
                AbbreviationMap::default(),
            )),
            download_dir,
        }
    }
}

/// How far a run got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every stage ran.
    Completed,
    /// The page could not be fetched; nothing else ran.
    PageUnavailable,
    /// The page had no matching links; nothing was downloaded.
    NoLinks,
    /// No link could be downloaded; nothing was extracted or packaged.
    NoDownloads,
}

/// Row and path summary of the written table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Written file.
    pub path: PathBuf,
    /// Data rows written.
    pub rows: usize,
    /// Cells changed by abbreviation expansion.
    pub expanded_cells: usize,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Final state of the run.
    pub outcome: RunOutcome,
    /// Links found on the page.
    pub links: Vec<PdfLink>,
    /// Files saved by the download stage.
    pub downloaded: Vec<DownloadedFile>,
    /// Table file, when one was written.
    pub table: Option<TableSummary>,
    /// PDF archive, when created.
    pub pdf_archive: Option<PathBuf>,
    /// Table archive, when created.
    pub table_archive: Option<PathBuf>,
}

impl PipelineReport {
    fn stopped(outcome: RunOutcome, links: Vec<PdfLink>) -> Self {
        Self {
            outcome,
            links,
            downloaded: Vec::new(),
            table: None,
            pdf_archive: None,
            table_archive: None,
        }
    }
}

/// Runs the stages in order with one client and one extraction backend.
pub struct Pipeline {
    config: PipelineConfig,
    client: HttpClient,
    extractor: Arc<dyn TableExtractor + Send + Sync>,
}

impl Pipeline {
    /// Creates a pipeline from its settings and collaborators.
    #[must_use]
    pub fn new(
        config: PipelineConfig,
        client: HttpClient,
        extractor: Arc<dyn TableExtractor + Send + Sync>,
    ) -> Self {
        Self {
            config,
            client,
            extractor,
        }
    }

    /// The settings this pipeline runs with.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Executes one run.
    pub async fn run(&self) -> PipelineReport {
        let config = &self.config;

        info!(url = %config.page_url, rule = %config.marker_rule, "discovering attachment links");
        let links = match discovery::discover_links(
            &self.client,
            &config.page_url,
            config.marker_rule,
        )
        .await
        {
            Ok(links) => links,
            Err(e) => {
                error!(error = %e, "could not read source page");
                return PipelineReport::stopped(RunOutcome::PageUnavailable, Vec::new());
            }
        };
        if links.is_empty() {
            warn!("no PDF attachment links found");
            return PipelineReport::stopped(RunOutcome::NoLinks, links);
        }

        info!(links = links.len(), dir = %config.download_dir.display(), "downloading attachments");
        let downloaded =
            match download::download_all(&self.client, &links, &config.download_dir).await {
                Ok(files) => files,
                Err(e) => {
                    error!(error = %e, "could not prepare download directory");
                    Vec::new()
                }
            };
        if downloaded.is_empty() {
            warn!("no attachment could be downloaded");
            return PipelineReport::stopped(RunOutcome::NoDownloads, links);
        }

        let table = match &config.extraction {
            Some(extraction) => self.extract_table(&downloaded, extraction).await,
            None => None,
        };

        let pdf_paths: Vec<&Path> = downloaded.iter().map(DownloadedFile::path).collect();
        let pdf_archive = package_files(&pdf_paths, &config.pdf_archive);

        let table_archive = match (&table, &config.extraction) {
            (Some(summary), Some(extraction)) => {
                package_files(&[summary.path.as_path()], &extraction.table_archive)
            }
            _ => None,
        };

        let report = PipelineReport {
            outcome: RunOutcome::Completed,
            links,
            downloaded,
            table,
            pdf_archive,
            table_archive,
        };
        info!(
            links = report.links.len(),
            downloaded = report.downloaded.len(),
            table_rows = report.table.as_ref().map_or(0, |t| t.rows),
            pdf_archive = ?report.pdf_archive,
            table_archive = ?report.table_archive,
            "run finished"
        );
        report
    }

    /// PDF parsing runs on the blocking thread pool.
    async fn extract_table(
        &self,
        downloaded: &[DownloadedFile],
        extraction: &ExtractionConfig,
    ) -> Option<TableSummary> {
        info!(documents = downloaded.len(), "extracting tables");
        let paths: Vec<PathBuf> = downloaded
            .iter()
            .map(|file| file.path().to_path_buf())
            .collect();
        let extractor = Arc::clone(&self.extractor);
        let extracted =
            tokio::task::spawn_blocking(move || extract::extract_all(extractor.as_ref(), &paths))
                .await;
        let mut table = match extracted {
            Ok(table) => table,
            Err(e) => {
                error!(error = %e, "table extraction task failed");
                return None;
            }
        };
        if table.is_empty() {
            warn!("no table found");
            return None;
        }

        let expanded_cells = extraction.abbreviations.apply(&mut table);
        info!(cells = expanded_cells, "expanded abbreviations");

        match extract::write_delimited(&table, &extraction.table_path, extraction.delimiter) {
            Ok(()) => Some(TableSummary {
                path: extraction.table_path.clone(),
                rows: table.len(),
                expanded_cells,
            }),
            Err(e) => {
                error!(error = %e, "could not write table file");
                None
            }
        }
    }
}

/// Packages `files`, logging instead of failing.
fn package_files(files: &[&Path], archive: &Path) -> Option<PathBuf> {
    match package::create_zip(files, archive) {
        Ok(PackageOutcome::Created { path, .. }) => Some(path),
        Ok(PackageOutcome::SkippedEmpty) => None,
        Err(e) => {
            error!(error = %e, "could not create archive");
            None
        }
    }
}
