//! HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TransportError;
use crate::port::outbound::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Sends requests with a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxy, TLS roots...).
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Map a `reqwest` failure onto the transport taxonomy.
fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_builder() {
        TransportError::Request(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .bearer_auth(&request.bearer_token)
            .timeout(request.timeout)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(&e))?;
        Ok(HttpResponse::new(status, body))
    }
}
