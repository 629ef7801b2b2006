//! Network transport seam.
//!
//! The dispatcher and the image loader never talk to `reqwest` directly; they
//! go through [`Transport`], which lets tests substitute a scripted transport
//! and count network calls.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// One outgoing HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// Upper bound for the whole exchange, connect through body.
    pub timeout: Duration,
}

/// Raw HTTP response: status plus the full body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failure below the HTTP layer.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(format!("request timed out after {}s", after.as_secs()))
    }
}

/// Executes HTTP requests on behalf of the core.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and collects the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure`] on connection errors and timeouts. A
    /// response with a non-2xx status is still an `Ok`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let timeout = request.timeout;
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportFailure::timeout(timeout)
            } else {
                TransportFailure::new(e.to_string())
            }
        };

        let response = self
            .client
            .request(request.method, request.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_err)?;

        tracing::trace!(status, len = body.len(), "response received");
        Ok(HttpResponse { status, body })
    }
}
