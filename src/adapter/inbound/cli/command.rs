//! Command-line interface definitions.
//!
//! Defines the CLI structure for the triage application using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{FailurePolicy, TicketColumns};
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::classify::ClassifyRequest;

/// Summarize and classify support tickets with a language model
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize and classify every ticket of a CSV dataset
    Classify(Box<ClassifyArgs>),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `triage check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration and report whether the API key is present
    Config,
}

/// What to do with a row whose provider call failed for good.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OnError {
    /// Fail the whole run
    Abort,
    /// Mark the row with category ERROR and continue
    Mark,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => Self::Abort,
            OnError::Mark => Self::Mark,
        }
    }
}

/// Arguments for the `classify` subcommand.
///
/// Unset options fall back to the `[provider]` and `[batch]` configuration.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Path to the CSV dataset
    pub dataset: PathBuf,

    /// Column holding the ticket text
    #[arg(long, short = 't')]
    pub text_column: String,

    /// Column holding the ticket identifier
    #[arg(long)]
    pub id_column: Option<String>,

    /// Column holding the intake channel
    #[arg(long, visible_alias = "canal-column")]
    pub channel_column: Option<String>,

    /// Column holding the ticket priority
    #[arg(long, visible_alias = "prioridade-column")]
    pub priority_column: Option<String>,

    /// Allowed category (repeat, or separate with commas)
    #[arg(
        long = "category",
        short = 'c',
        value_delimiter = ',',
        required = true,
        num_args = 1..
    )]
    pub categories: Vec<String>,

    /// Classify at most this many rows [default: 100]
    #[arg(long, conflicts_with = "all_rows")]
    pub max_rows: Option<usize>,

    /// Classify every row of the dataset
    #[arg(long)]
    pub all_rows: bool,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Language of the summaries, e.g. pt-BR
    #[arg(long)]
    pub locale: Option<String>,

    /// Provider model identifier
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Write the dataset with summary and predicted_category columns here
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// CSV separator; `tab` or `\t` for tabs. Autodetected when omitted
    #[arg(long, value_parser = parse_separator)]
    pub separator: Option<char>,

    /// CSV encoding: utf-8-sig, utf-8 or latin-1. Autodetected when omitted
    #[arg(long)]
    pub encoding: Option<String>,

    /// Behaviour when a row fails after all retries
    #[arg(long, value_enum)]
    pub on_error: Option<OnError>,

    /// Rows in flight at once
    #[arg(long)]
    pub concurrency: Option<usize>,
}

impl ClassifyArgs {
    /// Build the use-case request, filling gaps from `config`.
    #[must_use]
    pub fn to_request(&self, config: &Config) -> ClassifyRequest {
        let mut columns = TicketColumns::new(&self.text_column);
        columns.id = self.id_column.clone();
        columns.channel = self.channel_column.clone();
        columns.priority = self.priority_column.clone();

        let max_rows = if self.all_rows {
            None
        } else {
            Some(self.max_rows.unwrap_or(config.batch.max_rows))
        };

        ClassifyRequest {
            dataset_path: self.dataset.clone(),
            columns,
            categories: self.categories.clone(),
            max_rows,
            temperature: self.temperature.unwrap_or(config.provider.temperature),
            locale: self
                .locale
                .clone()
                .unwrap_or_else(|| config.batch.locale.clone()),
            model: self
                .model
                .clone()
                .unwrap_or_else(|| config.provider.model.clone()),
            output_path: self.output.clone(),
            csv_separator: self.separator,
            csv_encoding: self.encoding.clone(),
            failure_policy: self
                .on_error
                .map_or(config.batch.failure_policy, FailurePolicy::from),
        }
    }

    /// Concurrency for this run.
    #[must_use]
    pub fn concurrency(&self, config: &Config) -> usize {
        self.concurrency.unwrap_or(config.batch.max_concurrency)
    }
}

/// Parse a separator argument.
fn parse_separator(raw: &str) -> Result<char, String> {
    match raw {
        "tab" | "\\t" | "\t" => return Ok('\t'),
        "semicolon" => return Ok(';'),
        "comma" => return Ok(','),
        "pipe" => return Ok('|'),
        _ => {}
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("'{raw}' is not a single ASCII character")),
    }
}
