//! Table extraction backends.

use std::path::Path;

use tracing::debug;
use unpdf::{Block, Table, TableRow};

use super::error::ExtractError;
use super::table::ExtractedTable;

/// Converts a PDF document's visual tables into [`ExtractedTable`]s.
///
/// Implementations return tables in document order. Returning an empty
/// vector means the document has no detectable table.
pub trait TableExtractor {
    /// Extracts every table found in the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Extraction` when the document cannot be read.
    fn extract_tables(&self, path: &Path) -> Result<Vec<ExtractedTable>, ExtractError>;
}

/// Extractor backed by the `unpdf` layout parser.
///
/// The first row of each detected table supplies the column names.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnpdfExtractor;

impl TableExtractor for UnpdfExtractor {
    fn extract_tables(&self, path: &Path) -> Result<Vec<ExtractedTable>, ExtractError> {
        let document = unpdf::parse_file(path).map_err(|e| ExtractError::extraction(path, e))?;

        let tables: Vec<ExtractedTable> = document
            .pages
            .iter()
            .flat_map(|page| page.elements.iter())
            .filter_map(|block| match block {
                Block::Table(table) => convert_table(table),
                _ => None,
            })
            .collect();

        debug!(
            path = %path.display(),
            pages = document.pages.len(),
            tables = tables.len(),
            "parsed document"
        );
        Ok(tables)
    }
}

/// Header from the first row, records from the rest. Row-less tables yield `None`.
fn convert_table(table: &Table) -> Option<ExtractedTable> {
    let (header, body) = table.rows.split_first()?;

    let columns = row_text(header)
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name
            }
        })
        .collect();

    let mut extracted = ExtractedTable::new(columns);
    for row in body {
        extracted.push_row(row_text(row));
    }
    Some(extracted)
}

fn row_text(row: &TableRow) -> Vec<String> {
    row.cells
        .iter()
        .map(|cell| collapse_whitespace(&cell.plain_text()))
        .collect()
}

/// Joins wrapped cell lines into a single space-separated line.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
