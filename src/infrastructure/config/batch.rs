//! Batch execution configuration.

use serde::Deserialize;

use crate::application::classify::DEFAULT_MAX_CONCURRENCY;
use crate::domain::FailurePolicy;
use crate::port::inbound::classify::{DEFAULT_LOCALE, DEFAULT_MAX_ROWS};

/// Defaults for classification runs.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Rows in flight at once. Defaults to 4. Overridden by
    /// `MAX_CONCURRENCY`.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Rows classified per run unless the command says otherwise.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Summary language. Defaults to "pt-BR".
    #[serde(default = "default_locale")]
    pub locale: String,

    /// `abort` (default) or `mark`.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

const fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

const fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            max_rows: default_max_rows(),
            locale: default_locale(),
            failure_policy: FailurePolicy::default(),
        }
    }
}
