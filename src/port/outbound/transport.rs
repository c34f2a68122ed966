//! HTTP transport port.
//!
//! Separates the wire exchange from retry and decoding logic so the
//! completion client can be driven by a scripted transport in tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

/// A JSON POST request.
#[derive(Clone)]
pub struct HttpRequest {
    pub url: String,
    pub bearer_token: String,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("bearer_token", &"<redacted>")
            .field("body", &self.body)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Status and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Sends one HTTP request. Does not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `request.body` as JSON and return whatever status came back.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] only when no HTTP response was obtained.
    async fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
