//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use anexos_core::download::MAX_TIMEOUT_SECS;
use anexos_core::{AbbreviationPreset, MarkerRule};
use clap::{Parser, ValueEnum};

/// Collect, tabulate and package PDF attachments published on a web page.
///
/// Anexos scans a page for attachment links, downloads the PDFs, merges
/// their tables into one delimited file, and writes ZIP archives of both.
#[derive(Parser, Debug)]
#[command(name = "anexos")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/anexos/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Page to scan for attachment links
    #[arg(long, value_name = "URL")]
    pub page_url: Option<String>,

    /// Directory for downloaded PDFs, the table file and archives
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Rule selecting attachment links among PDF links
    #[arg(long, value_enum)]
    pub marker: Option<MarkerArg>,

    /// Expansion text set for the OD/AMB codes
    #[arg(long, value_enum)]
    pub abbreviations: Option<PresetArg>,

    /// Skip table extraction; only package the PDFs
    #[arg(long)]
    pub no_extract: bool,

    /// Field delimiter of the table file (single ASCII character, or "tab")
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Per-request timeout in seconds (1-300)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS))]
    pub timeout: Option<u64>,
}

/// Link selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkerArg {
    /// Anchor text contains "Anexo"
    Text,
    /// Link path contains "anexo-i" or "anexo-ii"
    Url,
}

impl From<MarkerArg> for MarkerRule {
    fn from(arg: MarkerArg) -> Self {
        match arg {
            MarkerArg::Text => Self::Text,
            MarkerArg::Url => Self::Url,
        }
    }
}

/// Abbreviation expansion preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// OD: Odontológica, AMB: Ambulatorial
    Procedures,
    /// OD: Olho Direito, AMB: Ambulatório
    Clinical,
}

impl From<PresetArg> for AbbreviationPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Procedures => Self::Procedures,
            PresetArg::Clinical => Self::Clinical,
        }
    }
}

/// Parses a delimiter: one printable ASCII character other than `"`, or `tab`.
pub(crate) fn parse_delimiter(raw: &str) -> Result<u8, String> {
    if raw.eq_ignore_ascii_case("tab") || raw == "\\t" || raw == "\t" {
        return Ok(b'\t');
    }
    match raw.as_bytes() {
        [byte] if byte.is_ascii_graphic() && *byte != b'"' => Ok(*byte),
        _ => Err(format!(
            "invalid delimiter '{raw}': expected one printable ASCII character other than '\"', or 'tab'"
        )),
    }
}
