//! Abbreviation expansion for categorical columns.
//!
//! Two expansion texts are in circulation for the same codes. They are kept
//! as separate presets and one is chosen per run; they are never merged.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::table::ExtractedTable;

/// Columns whose cells are expanded.
pub const ABBREVIATION_COLUMNS: [&str; 2] = ["OD", "AMB"];

/// Named expansion text sets for the `OD` and `AMB` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbbreviationPreset {
    /// `OD` → Odontológica, `AMB` → Ambulatorial (procedure coverage columns).
    #[default]
    Procedures,
    /// `OD` → Olho Direito, `AMB` → Ambulatório.
    Clinical,
}

impl AbbreviationPreset {
    /// Stable label used by the CLI and the config file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Procedures => "procedures",
            Self::Clinical => "clinical",
        }
    }

    fn expansions(self) -> [(&'static str, &'static str); 2] {
        match self {
            Self::Procedures => [("OD", "Odontológica"), ("AMB", "Ambulatorial")],
            Self::Clinical => [("OD", "Olho Direito"), ("AMB", "Ambulatório")],
        }
    }
}

impl fmt::Display for AbbreviationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown preset label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown abbreviation preset '{0}' (expected 'procedures' or 'clinical')")]
pub struct ParsePresetError(String);

impl FromStr for AbbreviationPreset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "procedures" => Ok(Self::Procedures),
            "clinical" => Ok(Self::Clinical),
            _ => Err(ParsePresetError(s.to_string())),
        }
    }
}

/// Code → expansion mapping applied to a fixed set of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationMap {
    columns: Vec<String>,
    expansions: Vec<(String, String)>,
}

impl AbbreviationMap {
    /// Builds a custom mapping over `columns`.
    #[must_use]
    pub fn new(columns: Vec<String>, expansions: Vec<(String, String)>) -> Self {
        Self {
            columns,
            expansions,
        }
    }

    /// Mapping for `preset` over [`ABBREVIATION_COLUMNS`].
    #[must_use]
    pub fn from_preset(preset: AbbreviationPreset) -> Self {
        Self::new(
            ABBREVIATION_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            preset
                .expansions()
                .iter()
                .map(|(code, text)| ((*code).to_string(), (*text).to_string()))
                .collect(),
        )
    }

    /// Expansion text for `code`, if mapped.
    #[must_use]
    pub fn expansion(&self, code: &str) -> Option<&str> {
        self.expansions
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, text)| text.as_str())
    }

    /// Replaces mapped codes in the designated columns, returning how many cells changed.
    ///
    /// Cells are compared after trimming surrounding whitespace. Designated
    /// columns missing from the table are ignored.
    pub fn apply(&self, table: &mut ExtractedTable) -> usize {
        let mut replaced = 0;
        for column in &self.columns {
            let Some(index) = table.column_index(column) else {
                debug!(column = %column, "abbreviation column not present");
                continue;
            };
            for cell in table.column_cells_mut(index) {
                if let Some(text) = self.expansion(cell.trim()) {
                    *cell = text.to_string();
                    replaced += 1;
                }
            }
        }
        replaced
    }
}

impl Default for AbbreviationMap {
    fn default() -> Self {
        Self::from_preset(AbbreviationPreset::default())
    }
}
