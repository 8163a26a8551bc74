//! In-memory table produced by extraction.

use super::error::ExtractError;

/// Rows of string cells under a fixed list of column names.
///
/// Every row has exactly `columns().len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with empty cells and truncating long ones.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column named `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` under column `name`.
    #[must_use]
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column_index(name)?;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
    }

    /// Mutable access to every cell of column `index`.
    pub(crate) fn column_cells_mut(&mut self, index: usize) -> impl Iterator<Item = &mut String> {
        self.rows.iter_mut().filter_map(move |row| row.get_mut(index))
    }

    /// Appends `other`'s rows below this table's rows.
    ///
    /// A table with no rows adopts `other`'s columns, so a header-only table
    /// never fixes the schema. Otherwise the column lists must be identical.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::SchemaMismatch` and leaves `self` untouched when
    /// the column lists differ.
    pub fn append(&mut self, other: ExtractedTable) -> Result<(), ExtractError> {
        if self.rows.is_empty() {
            *self = other;
            return Ok(());
        }
        if self.columns != other.columns {
            return Err(ExtractError::schema_mismatch(&self.columns, &other.columns));
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}
