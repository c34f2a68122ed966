//! LLM completion port for the classification pipeline.
//!
//! Defines the interface the row processor uses to obtain a model reply for
//! one system/user prompt pair.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::CompletionReply;
use crate::error::Result;

/// Client for chat-style large language model completion.
///
/// Implementations handle authentication, timeouts, retries and response
/// decoding. One client is shared by every row task of a batch.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) to support concurrent
/// row processing.
///
/// # Errors
///
/// [`complete`](Self::complete) returns a provider error once retryable
/// failures are exhausted or a non-retryable failure occurs.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the provider name for logging and responses.
    fn name(&self) -> &'static str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Send one completion request made of a system and a user message.
    async fn complete(&self, system: &str, user: &str) -> Result<CompletionReply>;
}

/// Builds a completion client for one request's model and temperature.
pub trait CompletionClientFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns a configuration error when the provider cannot be set up,
    /// for example when its API key is missing.
    fn build(&self, model: &str, temperature: f64) -> Result<Arc<dyn CompletionClient>>;
}
