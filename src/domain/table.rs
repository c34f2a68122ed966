//! In-memory tabular dataset.
//!
//! Cells are `Option<String>`: a missing or placeholder value is `None`
//! everywhere past the dataset boundary, so business logic never sees
//! strings such as `"nan"`.

use super::error::DomainError;

/// Cell tokens treated as "no value" when a table is built from text.
///
/// Matches the NA spellings common in exported spreadsheets and dataframes.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Collapse a raw cell into the single "no value" representation.
#[must_use]
pub fn cell_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if NA_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Rectangular table with named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table from column names and rows of cells.
    ///
    /// Short rows are padded with `None`; long rows are truncated to the
    /// header width.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a table from raw text cells, applying [`cell_value`] to each.
    #[must_use]
    pub fn from_text_rows<R, C>(columns: Vec<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell_value(cell.as_ref())).collect())
            .collect();
        Self::new(columns, rows)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Value of `column` in row `row`, or `None` when absent.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    /// Rows as slices of cells, in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Copy of the table restricted to `columns`, in the given order.
    ///
    /// Unknown column names are skipped.
    #[must_use]
    pub fn select(&self, columns: &[&str]) -> Self {
        let indices: Vec<usize> = columns
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();

        let selected_columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Self {
            columns: selected_columns,
            rows,
        }
    }

    /// Keep only the first `limit` rows.
    #[must_use]
    pub fn head(mut self, limit: usize) -> Self {
        self.rows.truncate(limit);
        self
    }

    /// Append a column; `values` must have one entry per row.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ColumnLengthMismatch`] when the lengths differ.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Result<(), DomainError> {
        let name = name.into();
        if values.len() != self.rows.len() {
            return Err(DomainError::ColumnLengthMismatch {
                column: name,
                expected: self.rows.len(),
                got: values.len(),
            });
        }

        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }
}
