//! Retry configuration for provider calls.

use std::time::Duration;

use serde::Deserialize;

use crate::application::retry::RetryPolicy;

/// Retry settings applied to every completion request.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first. Defaults to 4.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff growth factor; the wait after attempt `n` is
    /// `backoff_unit_ms * backoff_base^n`. Defaults to 1.5.
    #[serde(default = "default_backoff_base")]
    pub backoff_base: f64,

    /// One backoff unit in milliseconds. Defaults to 1000.
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

const fn default_max_attempts() -> u32 {
    4
}

const fn default_backoff_base() -> f64 {
    1.5
}

const fn default_backoff_unit_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base: default_backoff_base(),
            backoff_unit_ms: default_backoff_unit_ms(),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff_base: self.backoff_base,
            backoff_unit: Duration::from_millis(self.backoff_unit_ms),
        }
    }
}
