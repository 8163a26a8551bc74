//! Delimited text serialization of an extracted table.

use std::path::Path;

use tracing::info;

use super::error::ExtractError;
use super::table::ExtractedTable;

/// Writes `table` to `path` as UTF-8 delimited text.
///
/// Header row first, one record per row, no index column. Fields holding the
/// delimiter, quotes or line breaks are quoted. Missing parent directories
/// are created and an existing file is overwritten.
///
/// # Errors
///
/// Returns `ExtractError::Io` if the parent directory cannot be created and
/// `ExtractError::Write` if the file cannot be written.
pub fn write_delimited(
    table: &ExtractedTable,
    path: &Path,
    delimiter: u8,
) -> Result<(), ExtractError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| ExtractError::write(path, e))?;

    writer
        .write_record(table.columns())
        .map_err(|e| ExtractError::write(path, e))?;
    for row in table.rows() {
        writer
            .write_record(row)
            .map_err(|e| ExtractError::write(path, e))?;
    }
    writer.flush().map_err(|e| ExtractError::io(path, e))?;

    info!(path = %path.display(), rows = table.len(), "table written");
    Ok(())
}
