//! Error types for table extraction and serialization.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while extracting, combining or writing tables.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The extraction backend could not read tables from a document.
    #[error("table extraction failed for {path}: {message}")]
    Extraction {
        /// Document that failed.
        path: PathBuf,
        /// Backend error message.
        message: String,
    },

    /// A table's columns differ from the columns already collected.
    #[error("column mismatch: expected [{}], found [{}]", expected.join(", "), found.join(", "))]
    SchemaMismatch {
        /// Columns fixed by the first table.
        expected: Vec<String>,
        /// Columns of the rejected table.
        found: Vec<String>,
    },

    /// Writing the delimited output failed.
    #[error("failed to write table to {path}: {source}")]
    Write {
        /// Output file.
        path: PathBuf,
        /// Underlying CSV writer error.
        #[source]
        source: csv::Error,
    },

    /// File system error around the output file.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Creates an extraction error from any backend error.
    pub fn extraction(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Extraction {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Creates a schema mismatch error.
    pub fn schema_mismatch(expected: &[String], found: &[String]) -> Self {
        Self::SchemaMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }

    /// Creates a CSV write error.
    pub fn write(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_lists_both_column_sets() {
        let error = ExtractError::schema_mismatch(
            &["PROCEDIMENTO".to_string(), "OD".to_string()],
            &["PROCEDIMENTO".to_string()],
        );
        let msg = error.to_string();
        assert!(msg.contains("expected [PROCEDIMENTO, OD]"), "{msg}");
        assert!(msg.contains("found [PROCEDIMENTO]"), "{msg}");
    }

    #[test]
    fn test_extraction_error_names_document() {
        let error = ExtractError::extraction("downloads/Anexo_I.pdf", "not a valid PDF");
        let msg = error.to_string();
        assert!(msg.contains("downloads/Anexo_I.pdf"), "{msg}");
        assert!(msg.contains("not a valid PDF"), "{msg}");
    }
}
