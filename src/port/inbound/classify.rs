//! Classification use case exposed to inbound adapters.
//!
//! Defines the request and response shapes for classifying a ticket
//! dataset, plus the trait the CLI drives.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{FailurePolicy, ItemResult, TicketColumns, TokenUsage};
use crate::error::Result;

pub const DEFAULT_MAX_ROWS: usize = 100;
pub const DEFAULT_LOCALE: &str = "pt-BR";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Parameters for one classification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Path of the CSV dataset.
    pub dataset_path: PathBuf,

    /// Which columns hold the ticket fields.
    pub columns: TicketColumns,

    /// Allowed category labels.
    pub categories: Vec<String>,

    /// Only the first `max_rows` rows are classified. `None` means all.
    pub max_rows: Option<usize>,

    /// Sampling temperature sent to the provider.
    pub temperature: f64,

    /// Language of the generated summaries.
    pub locale: String,

    /// Provider model identifier.
    pub model: String,

    /// Where to write the enriched table, if anywhere.
    pub output_path: Option<PathBuf>,

    /// Explicit CSV separator; autodetected when absent.
    pub csv_separator: Option<char>,

    /// Explicit CSV encoding; autodetected when absent.
    pub csv_encoding: Option<String>,

    /// Behaviour when a row fails after retries.
    pub failure_policy: FailurePolicy,
}

impl ClassifyRequest {
    /// Request with defaults for everything but the dataset, text column and
    /// categories.
    pub fn new(
        dataset_path: impl Into<PathBuf>,
        text_column: impl Into<String>,
        categories: Vec<String>,
    ) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            columns: TicketColumns::new(text_column),
            categories,
            max_rows: Some(DEFAULT_MAX_ROWS),
            temperature: 0.0,
            locale: DEFAULT_LOCALE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            output_path: None,
            csv_separator: None,
            csv_encoding: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Outcome of a classification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub provider: String,
    pub model: String,
    pub n_rows: usize,
    pub seconds_total: f64,
    pub results: Vec<ItemResult>,
    pub output_csv_path: Option<PathBuf>,
    pub usage: TokenUsage,
}

/// Classify a ticket dataset end to end.
#[async_trait]
pub trait ClassifyTickets: Send + Sync {
    /// # Errors
    ///
    /// Returns configuration, dataset, or provider errors. Under the default
    /// failure policy any row failure fails the whole run.
    async fn classify(&self, request: ClassifyRequest) -> Result<ClassifyResponse>;
}
