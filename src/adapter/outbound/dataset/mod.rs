//! Dataset adapters.

pub mod delimited;

pub use delimited::CsvDataset;
