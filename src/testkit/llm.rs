//! Fake completion clients.
//!
//! - [`StaticClient`] - Same reply for every request; records prompts.
//! - [`FailingClient`] - Every request fails with a provider error.
//! - [`LatencyClient`] - Echoes a reply derived from the prompt after a
//!   per-ticket delay, tracking how many calls overlap. Chosen tickets can
//!   fail instead.
//! - [`FixedFactory`] - Client factory returning one shared client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::CompletionReply;
use crate::error::{ProviderError, Result};
use crate::port::outbound::llm::{CompletionClient, CompletionClientFactory};

const MODEL: &str = "fake-model";

// ---------------------------------------------------------------------------
// StaticClient
// ---------------------------------------------------------------------------

/// Returns the same reply to every request.
pub struct StaticClient {
    reply: CompletionReply,
    prompts: Mutex<Vec<(String, String)>>,
}

impl StaticClient {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_reply(CompletionReply::text(text))
    }

    pub fn with_reply(reply: CompletionReply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// `(system, user)` pairs received so far, in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for StaticClient {
    fn name(&self) -> &'static str {
        "static"
    }

    fn model(&self) -> &str {
        MODEL
    }

    async fn complete(&self, system: &str, user: &str) -> Result<CompletionReply> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((system.to_string(), user.to_string()));
        }
        Ok(self.reply.clone())
    }
}

// ---------------------------------------------------------------------------
// FailingClient
// ---------------------------------------------------------------------------

/// Fails every request, or only requests whose prompt contains a marker.
pub struct FailingClient {
    cause: String,
    only_when: Option<String>,
    fallback: CompletionReply,
}

impl FailingClient {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            only_when: None,
            fallback: CompletionReply::default(),
        }
    }

    /// Fail only when the user prompt contains `marker`; otherwise reply
    /// with `reply`.
    pub fn when_prompt_contains(
        cause: impl Into<String>,
        marker: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        Self {
            cause: cause.into(),
            only_when: Some(marker.into()),
            fallback: CompletionReply::text(reply),
        }
    }
}

#[async_trait]
impl CompletionClient for FailingClient {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn model(&self) -> &str {
        MODEL
    }

    async fn complete(&self, _system: &str, user: &str) -> Result<CompletionReply> {
        let fails = self
            .only_when
            .as_deref()
            .map_or(true, |marker| user.contains(marker));
        if fails {
            return Err(ProviderError::RetriesExhausted {
                attempts: 4,
                last: self.cause.clone(),
            }
            .into());
        }
        Ok(self.fallback.clone())
    }
}

// ---------------------------------------------------------------------------
// LatencyClient
// ---------------------------------------------------------------------------

/// Sleeps before answering and records peak call overlap.
///
/// The reply's summary echoes the ticket text found in the user prompt, so
/// tests can check which row a result belongs to.
pub struct LatencyClient {
    default_delay: Duration,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, String>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl LatencyClient {
    pub fn new(default_delay: Duration) -> Self {
        Self {
            default_delay,
            delays: HashMap::new(),
            failures: HashMap::new(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Use `delay` for the ticket whose text is exactly `text`.
    pub fn with_delay(mut self, text: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(text.into(), delay);
        self
    }

    /// Fail the ticket whose text is exactly `text` once its delay elapses.
    pub fn with_failure(mut self, text: impl Into<String>, cause: impl Into<String>) -> Self {
        self.failures.insert(text.into(), cause.into());
        self
    }

    /// Highest number of concurrent `complete` calls observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Ticket text embedded in a user prompt built by the prompt builder.
pub fn ticket_text(user_prompt: &str) -> &str {
    user_prompt
        .lines()
        .skip_while(|line| *line != "TICKET TEXT:")
        .nth(1)
        .unwrap_or_default()
}

#[async_trait]
impl CompletionClient for LatencyClient {
    fn name(&self) -> &'static str {
        "latency"
    }

    fn model(&self) -> &str {
        MODEL
    }

    async fn complete(&self, _system: &str, user: &str) -> Result<CompletionReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let text = ticket_text(user).to_string();
        let delay = self.delays.get(&text).copied().unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(cause) = self.failures.get(&text) {
            return Err(ProviderError::RetriesExhausted {
                attempts: 4,
                last: cause.clone(),
            }
            .into());
        }

        let body = serde_json::json!({ "summary": text, "category": "billing" });
        Ok(CompletionReply {
            text: body.to_string(),
            input_tokens: Some(10),
            output_tokens: Some(2),
        })
    }
}

// ---------------------------------------------------------------------------
// FixedFactory
// ---------------------------------------------------------------------------

/// Hands out the same client for every request and records what was asked.
pub struct FixedFactory {
    client: Arc<dyn CompletionClient>,
    requested: Mutex<Vec<(String, f64)>>,
}

impl FixedFactory {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// `(model, temperature)` pairs passed to `build`.
    pub fn requested(&self) -> Vec<(String, f64)> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl CompletionClientFactory for FixedFactory {
    fn build(&self, model: &str, temperature: f64) -> Result<Arc<dyn CompletionClient>> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push((model.to_string(), temperature));
        }
        Ok(Arc::clone(&self.client))
    }
}
