//! Dataset ports: where tables come from and where enriched tables go.

use std::path::Path;

use crate::domain::Table;
use crate::error::Result;

/// How a dataset file should be decoded.
///
/// `None` fields are autodetected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Field separator, e.g. `;` or `\t`.
    pub separator: Option<char>,
    /// Text encoding name: `utf-8-sig`, `utf-8` or `latin-1`.
    pub encoding: Option<String>,
}

/// Loads a table from a path.
pub trait TableSource: Send + Sync {
    /// # Errors
    ///
    /// Returns a dataset error if the file is missing or cannot be decoded.
    fn load(&self, path: &Path, options: &ReadOptions) -> Result<Table>;
}

/// Persists an enriched table.
pub trait TableSink: Send + Sync {
    /// # Errors
    ///
    /// Returns a dataset error if the table cannot be written.
    fn write(&self, path: &Path, table: &Table) -> Result<()>;
}
