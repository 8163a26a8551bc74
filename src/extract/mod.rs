//! Table extraction, normalization and serialization.
//!
//! Tables from every downloaded PDF are concatenated into one
//! [`ExtractedTable`], codes in the `OD`/`AMB` columns are expanded with an
//! [`AbbreviationMap`], and the result is written with [`write_delimited`].
//!
//! Concatenation requires identical column lists: the first table with
//! records fixes the schema and any later table with different columns is
//! rejected and logged.

mod error;
mod extractor;
mod normalize;
mod table;
mod writer;

use std::path::Path;

use tracing::{debug, info, warn};

pub use error::ExtractError;
pub use extractor::{TableExtractor, UnpdfExtractor};
pub use normalize::{ABBREVIATION_COLUMNS, AbbreviationMap, AbbreviationPreset, ParsePresetError};
pub use table::ExtractedTable;
pub use writer::write_delimited;

/// Extracts and concatenates the tables of every document in `paths`.
///
/// Tables are appended in document order, first within a PDF and then across
/// PDFs. A document that fails to parse or has no table contributes nothing;
/// a header-only table is ignored and the first table with records fixes the
/// schema. A table whose columns differ from that schema is skipped. None of
/// these cases stops the batch.
pub fn extract_all<P: AsRef<Path>>(
    extractor: &dyn TableExtractor,
    paths: &[P],
) -> ExtractedTable {
    let mut combined = ExtractedTable::default();

    for path in paths {
        let path = path.as_ref();
        let tables = match extractor.extract_tables(path) {
            Ok(tables) => tables,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "table extraction failed, skipping");
                continue;
            }
        };
        if tables.is_empty() {
            warn!(path = %path.display(), "no table found in document");
            continue;
        }

        for (index, table) in tables.into_iter().enumerate() {
            let rows = table.len();
            if table.is_empty() {
                debug!(
                    path = %path.display(),
                    table = index + 1,
                    "table has no records, skipping"
                );
                continue;
            }
            if let Err(error) = combined.append(table) {
                warn!(
                    path = %path.display(),
                    table = index + 1,
                    rows,
                    error = %error,
                    "table columns differ from first table, skipping"
                );
            }
        }
    }

    info!(
        documents = paths.len(),
        rows = combined.len(),
        columns = combined.columns().len(),
        "table extraction finished"
    );
    combined
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;

    /// Extractor serving canned results keyed by file name.
    struct CannedExtractor(HashMap<&'static str, Result<Vec<ExtractedTable>, &'static str>>);

    impl TableExtractor for CannedExtractor {
        fn extract_tables(&self, path: &Path) -> Result<Vec<ExtractedTable>, ExtractError> {
            let name = path.file_name().unwrap().to_str().unwrap();
            match self.0.get(name) {
                Some(Ok(tables)) => Ok(tables.clone()),
                Some(Err(message)) => Err(ExtractError::extraction(path, message)),
                None => Ok(Vec::new()),
            }
        }
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> ExtractedTable {
        let mut t = ExtractedTable::new(columns.iter().map(|c| (*c).to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|c| (*c).to_string()).collect());
        }
        t
    }

    #[test]
    fn test_concatenates_within_and_across_documents_in_order() {
        let extractor = CannedExtractor(HashMap::from([
            (
                "a.pdf",
                Ok(vec![
                    table(&["P", "OD"], &[&["1", "OD"]]),
                    table(&["P", "OD"], &[&["2", ""]]),
                ]),
            ),
            ("b.pdf", Ok(vec![table(&["P", "OD"], &[&["3", "OD"]])])),
        ]));
        let paths = [PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];

        let combined = extract_all(&extractor, &paths);

        let firsts: Vec<&str> = combined.rows().iter().map(|r| r[0].as_str()).collect();
        assert_eq!(firsts, ["1", "2", "3"]);
    }

    #[test]
    fn test_failed_and_empty_documents_are_skipped() {
        let extractor = CannedExtractor(HashMap::from([
            ("broken.pdf", Err("corrupted xref")),
            ("ok.pdf", Ok(vec![table(&["P"], &[&["1"]])])),
        ]));
        let paths = ["broken.pdf", "empty.pdf", "ok.pdf"].map(PathBuf::from);

        let combined = extract_all(&extractor, &paths);

        assert_eq!(combined.len(), 1);
        assert_eq!(combined.columns(), ["P"]);
    }

    #[test]
    fn test_mismatched_schema_is_rejected_not_merged() {
        let extractor = CannedExtractor(HashMap::from([
            ("a.pdf", Ok(vec![table(&["P", "OD"], &[&["1", "OD"]])])),
            ("b.pdf", Ok(vec![table(&["P", "AMB"], &[&["2", "AMB"]])])),
            ("c.pdf", Ok(vec![table(&["P", "OD"], &[&["3", ""]])])),
        ]));
        let paths = ["a.pdf", "b.pdf", "c.pdf"].map(PathBuf::from);

        let combined = extract_all(&extractor, &paths);

        assert_eq!(combined.columns(), ["P", "OD"]);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.cell(1, "P"), Some("3"));
    }

    #[test]
    fn test_header_only_table_does_not_fix_schema() {
        let extractor = CannedExtractor(HashMap::from([
            ("a.pdf", Ok(vec![table(&["Agência Nacional"], &[])])),
            ("b.pdf", Ok(vec![table(&["P", "OD"], &[&["1", "OD"]])])),
            ("c.pdf", Ok(vec![table(&["P", "OD"], &[&["2", ""]])])),
        ]));
        let paths = ["a.pdf", "b.pdf", "c.pdf"].map(PathBuf::from);

        let combined = extract_all(&extractor, &paths);

        assert_eq!(combined.columns(), ["P", "OD"]);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.cell(1, "P"), Some("2"));
    }

    #[test]
    fn test_no_tables_anywhere_yields_empty_table() {
        let extractor = CannedExtractor(HashMap::new());
        let combined = extract_all(&extractor, &[PathBuf::from("a.pdf")]);
        assert!(combined.is_empty());
        assert!(combined.columns().is_empty());
    }
}
