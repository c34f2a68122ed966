//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration comes from an optional TOML file, then
//! environment variables: `OPENAI_API_KEY` (never read from the file),
//! `OPENAI_BASE_URL` and `MAX_CONCURRENCY`.
//!
//! # Example
//!
//! ```no_run
//! use triage::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("triage.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::batch::BatchConfig;
use super::logging::LoggingConfig;
use super::provider::ProviderConfig;
use super::retry::RetryConfig;
use crate::adapter::outbound::llm::openai::API_KEY_VAR;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `provider.base_url`.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Environment variable overriding `batch.max_concurrency`.
pub const MAX_CONCURRENCY_VAR: &str = "MAX_CONCURRENCY";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`], parse directly with
/// [`Config::parse_toml`], or start from defaults with [`Config::from_env`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Completion provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Retry and backoff for provider calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Batch defaults.
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Parse configuration from TOML content, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with(content, |name| std::env::var(name).ok())
    }

    /// Like [`parse_toml`](Self::parse_toml) with a custom environment
    /// lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml_with<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Defaults plus environment overrides, for runs without a file.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment override is invalid.
    pub fn from_env() -> Result<Self> {
        Self::parse_toml("")
    }

    /// Fill the API key and apply `OPENAI_BASE_URL` / `MAX_CONCURRENCY`.
    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        self.provider.api_key = present(API_KEY_VAR);

        if let Some(base_url) = present(BASE_URL_VAR) {
            self.provider.base_url = base_url.trim().to_string();
        }

        if let Some(raw) = present(MAX_CONCURRENCY_VAR) {
            self.batch.max_concurrency = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: MAX_CONCURRENCY_VAR,
                reason: format!("'{raw}' is not a positive integer"),
            })?;
        }

        Ok(())
    }

    /// Validate configuration values.
    ///
    /// The API key is not required here; commands that call the provider
    /// check for it when they build the client.
    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.provider.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }
            .into());
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "model" }.into());
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: "must be between 0 and 2".to_string(),
            }
            .into());
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.retry.backoff_base < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_base",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }

        if self.batch.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrency",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.batch.locale.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "locale" }.into());
        }

        Ok(())
    }

    /// Whether an API key was found in the environment.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::FailurePolicy;
    use crate::error::Error;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        env(&[])
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse_toml_with("", no_env()).unwrap();

        assert_eq!(config.provider.base_url, "https://api.openai.com/v1");
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.timeout_secs, 90);
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.batch.max_concurrency, 4);
        assert_eq!(config.batch.max_rows, 100);
        assert_eq!(config.batch.locale, "pt-BR");
        assert_eq!(config.batch.failure_policy, FailurePolicy::Abort);
        assert!(!config.has_api_key());
    }

    #[test]
    fn parses_all_sections() {
        let toml = r#"
            [logging]
            level = "debug"
            format = "json"

            [provider]
            base_url = "http://localhost:11434/v1"
            model = "llama3"
            temperature = 0.4
            timeout_secs = 30

            [retry]
            max_attempts = 2
            backoff_base = 2.0
            backoff_unit_ms = 10

            [batch]
            max_concurrency = 8
            max_rows = 500
            locale = "en-US"
            failure_policy = "mark"
        "#;

        let config = Config::parse_toml_with(toml, no_env()).unwrap();
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.provider.model, "llama3");
        assert_eq!(config.provider.temperature, 0.4);
        assert_eq!(config.retry.policy().max_attempts, 2);
        assert_eq!(config.batch.max_concurrency, 8);
        assert_eq!(config.batch.failure_policy, FailurePolicy::Mark);
    }

    #[test]
    fn environment_overrides_file() {
        let toml = r#"
            [provider]
            base_url = "https://example.com/v1"

            [batch]
            max_concurrency = 2
        "#;
        let config = Config::parse_toml_with(
            toml,
            env(&[
                ("OPENAI_API_KEY", "sk-live"),
                ("OPENAI_BASE_URL", "https://proxy.internal/v1"),
                ("MAX_CONCURRENCY", "12"),
            ]),
        )
        .unwrap();

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-live"));
        assert_eq!(config.provider.base_url, "https://proxy.internal/v1");
        assert_eq!(config.batch.max_concurrency, 12);
    }

    #[test]
    fn api_key_is_never_read_from_file() {
        let toml = r#"
            [provider]
            api_key = "sk-from-file"
        "#;
        let config = Config::parse_toml_with(toml, no_env()).unwrap();
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = Config::parse_toml_with("", env(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn rejects_non_numeric_concurrency() {
        let err = Config::parse_toml_with("", env(&[("MAX_CONCURRENCY", "many")])).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "MAX_CONCURRENCY",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = Config::parse_toml_with("", env(&[("MAX_CONCURRENCY", "0")])).unwrap_err();
        assert!(err.to_string().contains("max_concurrency"));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let toml = r#"
            [provider]
            base_url = "not a url"
        "#;
        assert!(Config::parse_toml_with(toml, no_env()).is_err());

        let toml = r#"
            [provider]
            base_url = "ftp://example.com"
        "#;
        let err = Config::parse_toml_with(toml, no_env()).unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn rejects_temperature_out_of_range() {
        let toml = r#"
            [provider]
            temperature = 3.0
        "#;
        assert!(Config::parse_toml_with(toml, no_env()).is_err());
    }

    #[test]
    fn rejects_zero_attempts_and_shrinking_backoff() {
        let zero = r#"
            [retry]
            max_attempts = 0
        "#;
        assert!(Config::parse_toml_with(zero, no_env()).is_err());

        let shrinking = r#"
            [retry]
            backoff_base = 0.5
        "#;
        assert!(Config::parse_toml_with(shrinking, no_env()).is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml_with("[provider\nmodel = 1", no_env()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn unknown_failure_policy_is_a_parse_error() {
        let toml = r#"
            [batch]
            failure_policy = "retry-forever"
        "#;
        let err = Config::parse_toml_with(toml, no_env()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
