//! Completion provider configuration.

use serde::Deserialize;

use crate::adapter::outbound::llm::openai::DEFAULT_BASE_URL;
use crate::port::inbound::classify::DEFAULT_MODEL;

/// Provider connection settings.
///
/// The API key is read from `OPENAI_API_KEY` at runtime and never from the
/// configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API root; `/chat/completions` is appended.
    ///
    /// Defaults to `https://api.openai.com/v1`. Overridden by
    /// `OPENAI_BASE_URL`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default model identifier. Defaults to "gpt-4o-mini".
    #[serde(default = "default_model")]
    pub model: String,

    /// Default sampling temperature (0.0 to 2.0). Defaults to 0.0.
    #[serde(default)]
    pub temperature: f64,

    /// Per-attempt request timeout in seconds. Defaults to 90.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key, filled from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

const fn default_timeout_secs() -> u64 {
    90
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}
