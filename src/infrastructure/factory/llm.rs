//! Completion client factory.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::adapter::outbound::llm::openai::OpenAi;
use crate::adapter::outbound::llm::transport::ReqwestTransport;
use crate::application::retry::RetryPolicy;
use crate::error::Result;
use crate::infrastructure::config::provider::ProviderConfig;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::llm::{CompletionClient, CompletionClientFactory};
use crate::port::outbound::transport::HttpTransport;

/// Builds [`OpenAi`] clients from provider settings.
pub struct OpenAiFactory {
    provider: ProviderConfig,
    retry: RetryPolicy,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiFactory {
    /// Factory sending requests over `reqwest`.
    #[must_use]
    pub fn new(provider: ProviderConfig, retry: RetryPolicy) -> Self {
        Self::with_transport(provider, retry, Arc::new(ReqwestTransport::new()))
    }

    #[must_use]
    pub fn with_transport(
        provider: ProviderConfig,
        retry: RetryPolicy,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            provider,
            retry,
            transport,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.provider.clone(), config.retry.policy())
    }
}

impl CompletionClientFactory for OpenAiFactory {
    fn build(&self, model: &str, temperature: f64) -> Result<Arc<dyn CompletionClient>> {
        let client = OpenAi::new(
            Arc::clone(&self.transport),
            self.provider.api_key.clone(),
            model,
            temperature,
        )?
        .with_base_url(&self.provider.base_url)
        .with_timeout(Duration::from_secs(self.provider.timeout_secs))
        .with_retry(self.retry);

        info!(
            provider = client.name(),
            model,
            base_url = %self.provider.base_url,
            "Completion client initialized"
        );
        Ok(Arc::new(client))
    }
}
