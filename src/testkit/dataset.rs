//! In-memory dataset storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::Table;
use crate::error::{DatasetError, Error, Result};
use crate::port::outbound::dataset::{ReadOptions, TableSink, TableSource};

/// Serves tables by path and captures written tables.
#[derive(Default)]
pub struct MemoryDataset {
    tables: HashMap<PathBuf, Table>,
    written: Mutex<Vec<(PathBuf, Table)>>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, path: impl Into<PathBuf>, table: Table) -> Self {
        self.tables.insert(path.into(), table);
        self
    }

    /// Tables passed to [`TableSink::write`], in call order.
    pub fn written(&self) -> Vec<(PathBuf, Table)> {
        self.written.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl TableSource for MemoryDataset {
    fn load(&self, path: &Path, _options: &ReadOptions) -> Result<Table> {
        self.tables
            .get(path)
            .cloned()
            .ok_or_else(|| DatasetError::NotFound(path.display().to_string()).into())
    }
}

impl TableSink for MemoryDataset {
    fn write(&self, path: &Path, table: &Table) -> Result<()> {
        let mut written = self
            .written
            .lock()
            .map_err(|e| Error::Dataset(DatasetError::Write(e.to_string())))?;
        written.push((path.to_path_buf(), table.clone()));
        Ok(())
    }
}
