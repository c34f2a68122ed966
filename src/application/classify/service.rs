//! Dataset-level classification service.
//!
//! Glues the dataset ports, the completion client factory and the batch
//! runner into the [`ClassifyTickets`] use case.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use super::batch::{BatchRunner, ProgressSink, DEFAULT_MAX_CONCURRENCY};
use super::row::RowProcessor;
use crate::domain::{CategorySet, ItemResult, Table, Ticket, TicketColumns};
use crate::error::{ConfigError, DatasetError, Result};
use crate::port::inbound::classify::{ClassifyRequest, ClassifyResponse, ClassifyTickets};
use crate::port::outbound::dataset::{ReadOptions, TableSink, TableSource};
use crate::port::outbound::llm::CompletionClientFactory;

/// Column appended to the output table with each row's summary.
pub const SUMMARY_COLUMN: &str = "summary";
/// Column appended to the output table with each row's category.
pub const CATEGORY_COLUMN: &str = "predicted_category";

/// Classifies ticket datasets.
pub struct ClassifyService {
    source: Arc<dyn TableSource>,
    sink: Arc<dyn TableSink>,
    clients: Arc<dyn CompletionClientFactory>,
    max_concurrency: usize,
    progress: Option<ProgressSink>,
}

impl ClassifyService {
    pub fn new(
        source: Arc<dyn TableSource>,
        sink: Arc<dyn TableSink>,
        clients: Arc<dyn CompletionClientFactory>,
    ) -> Self {
        Self {
            source,
            sink,
            clients,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Load the dataset and reduce it to the columns and rows to classify.
    fn working_table(&self, request: &ClassifyRequest) -> Result<Table> {
        let path = &request.dataset_path;
        if !path.exists() {
            return Err(DatasetError::NotFound(path.display().to_string()).into());
        }

        let options = ReadOptions {
            separator: request.csv_separator,
            encoding: request.csv_encoding.clone(),
        };
        let table = self.source.load(path, &options)?;
        check_columns(&table, &request.columns)?;

        let selected = table.select(&request.columns.all());
        Ok(match request.max_rows {
            Some(limit) => selected.head(limit),
            None => selected,
        })
    }

    fn write_output(&self, path: &Path, mut table: Table, results: &[ItemResult]) -> Result<()> {
        table.push_column(
            SUMMARY_COLUMN,
            results.iter().map(|r| Some(r.summary.clone())).collect(),
        )?;
        table.push_column(
            CATEGORY_COLUMN,
            results.iter().map(|r| Some(r.category.clone())).collect(),
        )?;
        self.sink.write(path, &table)?;
        info!(path = %path.display(), rows = table.len(), "Output written");
        Ok(())
    }
}

/// Fail when a configured column is absent from `table`.
fn check_columns(table: &Table, columns: &TicketColumns) -> Result<()> {
    let roles = [
        ("text", Some(columns.text.as_str())),
        ("id", columns.id.as_deref()),
        ("channel", columns.channel.as_deref()),
        ("priority", columns.priority.as_deref()),
    ];

    for (role, column) in roles {
        if let Some(column) = column {
            if !table.has_column(column) {
                return Err(DatasetError::MissingColumn {
                    role,
                    column: column.to_string(),
                    available: table.columns().to_vec(),
                }
                .into());
            }
        }
    }
    Ok(())
}

fn check_temperature(temperature: f64) -> Result<()> {
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ConfigError::InvalidValue {
            field: "temperature",
            reason: format!("{temperature} is outside 0.0..=2.0"),
        }
        .into());
    }
    Ok(())
}

#[async_trait]
impl ClassifyTickets for ClassifyService {
    async fn classify(&self, request: ClassifyRequest) -> Result<ClassifyResponse> {
        let started = Instant::now();

        let categories = CategorySet::try_new(&request.categories)?;
        check_temperature(request.temperature)?;
        let client = self.clients.build(&request.model, request.temperature)?;

        let table = self.working_table(&request)?;
        let tickets = Ticket::all_from(&table, &request.columns);
        info!(
            dataset = %request.dataset_path.display(),
            rows = tickets.len(),
            categories = categories.len(),
            model = %request.model,
            "Classifying dataset"
        );

        let provider = client.name().to_string();
        let processor = RowProcessor::new(client, Arc::new(categories), request.locale.as_str());
        let mut runner = BatchRunner::new(processor)
            .with_max_concurrency(self.max_concurrency)
            .with_failure_policy(request.failure_policy);
        if let Some(sink) = &self.progress {
            runner = runner.with_progress(Arc::clone(sink));
        }

        let outcome = runner.run(tickets).await?;

        if let Some(path) = &request.output_path {
            self.write_output(path, table, &outcome.results)?;
        }

        Ok(ClassifyResponse {
            provider,
            model: request.model,
            n_rows: outcome.results.len(),
            seconds_total: started.elapsed().as_secs_f64(),
            results: outcome.results,
            output_csv_path: request.output_path,
            usage: outcome.usage,
        })
    }
}
