//! OpenAI-compatible chat completion client.
//!
//! Provides an implementation of the [`CompletionClient`] trait for the
//! Chat Completions API. The wire exchange goes through an
//! [`HttpTransport`]; this module owns request encoding, retry with
//! backoff and response decoding.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::retry::{RetryPolicy, RetryState};
use crate::domain::{CompletionReply, CompletionRequest};
use crate::error::{ConfigError, ProviderError, Result};
use crate::port::outbound::llm::CompletionClient;
use crate::port::outbound::transport::{HttpRequest, HttpTransport};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Path appended to the base URL.
const COMPLETIONS_PATH: &str = "/chat/completions";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Statuses signalling overload or server-side failure; retried.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Chat completion client.
pub struct OpenAi {
    /// Sends the HTTP request.
    transport: Arc<dyn HttpTransport>,
    /// Bearer token for authentication.
    api_key: String,
    /// API root, without the completions path.
    base_url: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    model: String,
    /// Sampling temperature (0.0 to 2.0).
    temperature: f64,
    /// Timeout applied to every attempt.
    timeout: Duration,
    /// Attempt ceiling and backoff.
    retry: RetryPolicy,
}

impl std::fmt::Debug for OpenAi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAi")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl OpenAi {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `api_key` is absent or
    /// blank. No request is sent.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        api_key: Option<String>,
        model: impl Into<String>,
        temperature: f64,
    ) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingField { field: API_KEY_VAR })?;

        Ok(Self {
            transport,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            temperature,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        })
    }

    /// Create a client with the key from the `OPENAI_API_KEY` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(
        transport: Arc<dyn HttpTransport>,
        model: impl Into<String>,
        temperature: f64,
    ) -> Result<Self> {
        Self::new(transport, std::env::var(API_KEY_VAR).ok(), model, temperature)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Full URL of the completions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{COMPLETIONS_PATH}", self.base_url.trim_end_matches('/'))
    }

    fn http_request(&self, request: &CompletionRequest) -> Result<HttpRequest> {
        let body = Request {
            model: &request.model,
            temperature: request.temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        Ok(HttpRequest {
            url: self.endpoint(),
            bearer_token: self.api_key.clone(),
            body: serde_json::to_value(&body)?,
            timeout: self.timeout,
        })
    }

    /// Send `request`, retrying transient failures per the retry policy.
    async fn send(&self, request: &HttpRequest) -> Result<CompletionReply> {
        let mut machine = self.retry.start();

        loop {
            let attempt = machine.attempts();
            let cause = match self.transport.post_json(request).await {
                Ok(response) if response.is_success() => {
                    machine.succeed();
                    debug!(attempt, status = response.status, "Completion received");
                    return decode(&response.body);
                }
                Ok(response) if RETRYABLE_STATUSES.contains(&response.status) => {
                    format!("HTTP {}: {}", response.status, response.body.trim())
                }
                Ok(response) => {
                    return Err(ProviderError::Status {
                        status: response.status,
                        body: response.body,
                    }
                    .into());
                }
                Err(e) if e.is_retryable() => e.to_string(),
                Err(e) => return Err(ProviderError::Transport(e).into()),
            };

            match machine.fail() {
                RetryState::BackingOff { attempt, delay } => {
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        cause = %cause,
                        "Completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    machine.resume();
                }
                _ => {
                    return Err(ProviderError::RetriesExhausted {
                        attempts: machine.attempts(),
                        last: cause,
                    }
                    .into());
                }
            }
        }
    }
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<u64>,
    #[serde(default)]
    completion_tokens: Option<u64>,
}

/// Decode a successful response body into a reply.
fn decode(body: &str) -> Result<CompletionReply> {
    let response: Response = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("undecodable body: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".into()))?;

    let usage = response.usage;
    Ok(CompletionReply {
        text: choice.message.content.unwrap_or_default().trim().to_string(),
        input_tokens: usage.as_ref().and_then(|u| u.prompt_tokens),
        output_tokens: usage.as_ref().and_then(|u| u.completion_tokens),
    })
}

#[async_trait]
impl CompletionClient for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<CompletionReply> {
        let request = CompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            system: system.to_string(),
            user: user.to_string(),
        };
        let http = self.http_request(&request)?;
        self.send(&http).await
    }
}


/// Integration tests that require real API access.
/// Run with: `cargo test --features integration-tests -- --ignored`
#[cfg(all(test, feature = "integration-tests"))]
mod integration_tests {
    use super::*;
    use crate::adapter::outbound::llm::transport::ReqwestTransport;

    /// Requires OPENAI_API_KEY to be set.
    fn create_test_client() -> Option<OpenAi> {
        match OpenAi::from_env(Arc::new(ReqwestTransport::new()), "gpt-4o-mini", 0.0) {
            Ok(client) => Some(client),
            Err(e) => {
                eprintln!("Skipping OpenAI integration test: {}", e);
                None
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires OPENAI_API_KEY and network access"]
    async fn test_simple_completion() {
        let Some(client) = create_test_client() else {
            return;
        };

        let reply = client
            .complete("Answer briefly.", "Say 'hello' and nothing else.")
            .await
            .expect("API call failed");

        assert!(
            reply.text.to_lowercase().contains("hello"),
            "Expected 'hello' in response: {}",
            reply.text
        );
        assert!(reply.input_tokens.is_some());
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_invalid_api_key_error() {
        let client = OpenAi::new(
            Arc::new(ReqwestTransport::new()),
            Some("invalid-key-12345".into()),
            "gpt-4o-mini",
            0.0,
        )
        .unwrap();

        let err = client.complete("s", "test").await.unwrap_err();
        assert!(
            matches!(
                err,
                crate::error::Error::Provider(ProviderError::Status { status: 401, .. })
            ),
            "Expected HTTP 401, got: {:?}",
            err
        );
    }
}
