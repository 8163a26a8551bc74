//! CLI entry point for the anexos tool.

use std::sync::Arc;

use anexos_core::{HttpClient, Pipeline, RunOutcome, UnpdfExtractor};
use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};

mod app_config;
mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let file_config = app_config::load_config(args.config.as_deref())?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > info
    let default_level = app_config::default_log_filter(&args, file_config.as_ref());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    if let Some(cfg) = &file_config {
        debug!(?cfg, "config file loaded");
    }

    let settings = app_config::resolve_run_settings(&args, file_config.as_ref());
    let client = HttpClient::with_timeout(settings.timeout);
    let pipeline = Pipeline::new(settings.pipeline, client, Arc::new(UnpdfExtractor));

    let config = pipeline.config();
    info!(
        page = %config.page_url,
        output_dir = %config.download_dir.display(),
        extract_tables = config.extraction.is_some(),
        "Anexos starting"
    );

    let report = pipeline.run().await;

    match report.outcome {
        RunOutcome::Completed => {
            if let Some(path) = &report.pdf_archive {
                info!(archive = %path.display(), "PDF archive ready");
            }
            if let Some(table) = &report.table {
                info!(
                    file = %table.path.display(),
                    rows = table.rows,
                    expanded = table.expanded_cells,
                    "table file ready"
                );
            }
            if let Some(path) = &report.table_archive {
                info!(archive = %path.display(), "table archive ready");
            }
        }
        RunOutcome::PageUnavailable => warn!("source page unavailable, nothing collected"),
        RunOutcome::NoLinks => warn!("no attachments published on the page"),
        RunOutcome::NoDownloads => warn!("all attachment downloads failed"),
    }

    Ok(())
}
