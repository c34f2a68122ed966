//! Handler for the `classify` command.

use std::sync::Arc;

use serde_json::json;
use tabled::{Table, Tabled};
use tokio::signal;
use tracing::info;

use crate::adapter::inbound::cli::command::ClassifyArgs;
use crate::adapter::inbound::cli::output;
use crate::application::classify::{BatchProgress, ProgressSink};
use crate::domain::{ItemResult, UNPARSEABLE};
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::service::build_classify_service;
use crate::port::inbound::classify::{ClassifyResponse, ClassifyTickets};

const SUMMARY_WIDTH: usize = 60;

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

impl ResultRow {
    fn new(index: usize, item: &ItemResult) -> Self {
        let summary = match &item.error {
            Some(cause) => format!("error: {cause}"),
            None => item.summary.clone(),
        };
        Self {
            index: index + 1,
            id: item.id.clone().unwrap_or_else(|| "-".to_string()),
            category: item.category.clone(),
            summary: output::truncate(&summary, SUMMARY_WIDTH),
        }
    }
}

/// Execute the classify command.
pub async fn execute(args: &ClassifyArgs, config: &Config) -> Result<()> {
    let request = args.to_request(config);

    let pb = output::progress("Classifying");
    let bar = pb.clone();
    let sink: ProgressSink = Arc::new(move |progress: BatchProgress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.completed as u64);
    });

    let service = build_classify_service(config)
        .with_max_concurrency(args.concurrency(config))
        .with_progress(sink);

    let outcome = tokio::select! {
        result = service.classify(request) => result,
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received (Ctrl+C)");
            Err(Error::Task("interrupted".to_string()))
        }
    };

    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            output::progress_fail(&pb);
            return Err(err);
        }
    };

    output::progress_done(
        &pb,
        &format!(
            "Classified {} rows in {:.1}s",
            response.n_rows, response.seconds_total
        ),
    );

    if output::is_json() {
        output::json_output(json!({
            "command": "classify",
            "response": response,
        }));
        return Ok(());
    }

    print_report(&response);
    Ok(())
}

fn print_report(response: &ClassifyResponse) {
    if !output::is_quiet() && !response.results.is_empty() {
        let rows: Vec<ResultRow> = response
            .results
            .iter()
            .enumerate()
            .map(|(i, item)| ResultRow::new(i, item))
            .collect();
        output::section("Results");
        output::lines(&Table::new(rows).to_string());
    }

    output::section("Summary");
    output::field("Provider", &response.provider);
    output::field("Model", &response.model);
    output::field("Rows", response.n_rows);
    output::field("Seconds", format!("{:.2}", response.seconds_total));
    output::field(
        "Tokens",
        format!(
            "{} in / {} out",
            response.usage.input_tokens, response.usage.output_tokens
        ),
    );
    match &response.output_csv_path {
        Some(path) => output::field("Output", output::highlight(path.display())),
        None => output::hint("pass --output <path> to save the enriched CSV"),
    }

    let unparseable = response
        .results
        .iter()
        .filter(|item| item.category == UNPARSEABLE)
        .count();
    if unparseable > 0 {
        output::warning(&format!(
            "{unparseable} replies could not be decoded and were marked {UNPARSEABLE}"
        ));
    }

    let failed = response.results.iter().filter(|item| item.is_failed()).count();
    if failed > 0 {
        output::warning(&format!("{failed} rows failed and were marked ERROR"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParsedReply;

    #[test]
    fn result_row_numbers_from_one_and_fills_missing_id() {
        let item = ItemResult::classified(None, ParsedReply::new("short", "Billing"));
        let row = ResultRow::new(0, &item);
        assert_eq!(row.index, 1);
        assert_eq!(row.id, "-");
        assert_eq!(row.category, "Billing");
    }

    #[test]
    fn result_row_shows_failure_cause() {
        let item = ItemResult::failed(Some("T-9".to_string()), "HTTP 503");
        let row = ResultRow::new(3, &item);
        assert_eq!(row.id, "T-9");
        assert!(row.summary.contains("HTTP 503"));
    }

    #[test]
    fn result_row_truncates_long_summaries() {
        let item = ItemResult::classified(None, ParsedReply::new("x".repeat(200), "A"));
        let row = ResultRow::new(0, &item);
        assert_eq!(row.summary.chars().count(), SUMMARY_WIDTH);
    }
}
