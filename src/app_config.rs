//! File configuration and merging with command-line flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anexos_core::download::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use anexos_core::{
    AbbreviationMap, AbbreviationPreset, ExtractionConfig, MarkerRule, PipelineConfig,
};
use anyhow::{Context, Result, bail};

use crate::cli::{Args, parse_delimiter};

/// TOML-style file configuration for run defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Page scanned for attachment links.
    pub page_url: Option<String>,
    /// Directory for downloads, table file and archives.
    pub output_dir: Option<PathBuf>,
    /// Link selection rule.
    pub marker: Option<MarkerRule>,
    /// Abbreviation expansion preset.
    pub abbreviations: Option<AbbreviationPreset>,
    /// Whether to extract tables from downloaded PDFs.
    pub extract_tables: Option<bool>,
    /// Field delimiter of the table file.
    pub delimiter: Option<u8>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Log filter directive for this verbosity.
    #[must_use]
    pub fn filter(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/anexos/config.toml`
/// 2. `$HOME/.config/anexos/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("anexos")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("anexos")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the explicit config file, or the default one when present.
///
/// An explicit path must exist; a missing default file is not an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("Config file '{}' does not exist", path.display());
        }
        return load_file_config(path).map(Some);
    }

    match resolve_default_config_path() {
        Some(path) if path.exists() => load_file_config(&path).map(Some),
        _ => Ok(None),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "page_url" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `page_url` value on line {line_no}"))?;
                url::Url::parse(&parsed).with_context(|| {
                    format!("Invalid `page_url` '{parsed}' on line {line_no}: not an absolute URL")
                })?;
                cfg.page_url = Some(parsed);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_no}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "marker" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `marker` value on line {line_no}"))?;
                cfg.marker = Some(
                    parsed
                        .parse::<MarkerRule>()
                        .with_context(|| format!("Invalid `marker` value on line {line_no}"))?,
                );
            }
            "abbreviations" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `abbreviations` value on line {line_no}")
                })?;
                cfg.abbreviations = Some(parsed.parse::<AbbreviationPreset>().with_context(|| {
                    format!("Invalid `abbreviations` value on line {line_no}")
                })?);
            }
            "extract_tables" => {
                let parsed = parse_boolean(value)
                    .with_context(|| format!("Invalid `extract_tables` value on line {line_no}"))?;
                cfg.extract_tables = Some(parsed);
            }
            "delimiter" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `delimiter` value on line {line_no}"))?;
                let byte = parse_delimiter(&parsed).map_err(|msg| {
                    anyhow::anyhow!("Invalid `delimiter` value on line {line_no}: {msg}")
                })?;
                cfg.delimiter = Some(byte);
            }
            "timeout_secs" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `timeout_secs` value on line {line_no}"))?;
                cfg.timeout_secs = Some(parsed);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `verbosity` value on line {line_no}"))?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

impl FileConfig {
    /// Validates config values against CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout_secs
            && !(1..=MAX_TIMEOUT_SECS).contains(&timeout)
        {
            bail!(
                "Invalid config value for `timeout_secs`: {timeout}. Expected range: 1..={MAX_TIMEOUT_SECS}"
            );
        }
        Ok(())
    }
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected boolean value (true or false)"),
    }
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

/// Log filter directive: quiet flag > verbose flag > config verbosity > info.
#[must_use]
pub fn default_log_filter(args: &Args, file_config: Option<&FileConfig>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => file_config
            .and_then(|cfg| cfg.verbosity)
            .unwrap_or(VerbositySetting::Default)
            .filter(),
        1 => "debug",
        _ => "trace",
    }
}

/// Settings for one run after merging flags, file config and defaults.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Pipeline stage settings.
    pub pipeline: PipelineConfig,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

/// Merges flags over file config over defaults.
#[must_use]
pub fn resolve_run_settings(args: &Args, file_config: Option<&FileConfig>) -> RunSettings {
    let file = file_config.cloned().unwrap_or_default();

    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(anexos_core::pipeline::DEFAULT_DOWNLOAD_DIR));
    let mut pipeline = PipelineConfig::with_download_dir(output_dir);

    if let Some(page_url) = args.page_url.clone().or(file.page_url) {
        pipeline.page_url = page_url;
    }
    if let Some(marker) = args.marker.map(MarkerRule::from).or(file.marker) {
        pipeline.marker_rule = marker;
    }

    let extract_tables = !args.no_extract && file.extract_tables.unwrap_or(true);
    pipeline.extraction = extract_tables.then(|| {
        let preset = args
            .abbreviations
            .map(AbbreviationPreset::from)
            .or(file.abbreviations)
            .unwrap_or_default();
        let mut extraction = ExtractionConfig::in_dir(
            &pipeline.download_dir,
            AbbreviationMap::from_preset(preset),
        );
        if let Some(delimiter) = args.delimiter.or(file.delimiter) {
            extraction.delimiter = delimiter;
        }
        extraction
    });

    let timeout_secs = args
        .timeout
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    RunSettings {
        pipeline,
        timeout: Duration::from_secs(timeout_secs),
    }
}
