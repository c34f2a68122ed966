//! Scripted HTTP transport for exercising the provider client offline.
//!
//! [`ScriptedTransport`] replays a queue of responses and transport errors
//! in order. Once the queue runs dry the last entry repeats, so a single
//! `503` scripts "always unavailable".

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::TransportError;
use crate::port::outbound::transport::{HttpRequest, HttpResponse, HttpTransport};

type Scripted = Result<HttpResponse, TransportError>;

/// Replays scripted outcomes and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
    attempts: Arc<AtomicU32>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    /// Queue a successful chat completion whose message content is `content`.
    pub fn complete(self, content: &str) -> Self {
        self.respond(200, super::domain::completion_body(content))
    }

    /// Queue a transport-level failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.push(Err(error))
    }

    fn push(self, entry: Scripted) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
        self
    }

    /// Number of `post_json` calls made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Shared handle to the attempt counter.
    pub fn attempt_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.attempts)
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let mut last = self
            .last
            .lock()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        match next {
            Some(entry) => {
                *last = Some(entry.clone());
                entry
            }
            None => last.clone().unwrap_or_else(|| {
                Err(TransportError::Connection("no scripted response".into()))
            }),
        }
    }
}
