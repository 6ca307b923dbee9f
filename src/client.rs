//! HTTP client abstraction used by hammers


use crate::error::{AppError, Result};
use crate::types::HammerId;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;

/// User agent sent with every throw
pub const USER_AGENT: &str = concat!("thor/", env!("CARGO_PKG_VERSION"));

/// HTTP client trait for abstraction and testing
///
/// Implementations must return only after the whole response body has been
/// received, so that the caller's timing covers the full exchange.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a GET request and read the complete response
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// A single throw's request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Arc<str>,
    /// Hammer issuing the request
    pub hammer: HammerId,
    /// Index of the throw within that hammer
    pub throw: u32,
}

impl HttpRequest {
    pub fn new(url: Arc<str>, hammer: HammerId, throw: u32) -> Self {
        Self { url, hammer, throw }
    }
}

/// Completed HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub final_url: String,
}

/// reqwest-backed client
///
/// Idle connections are not kept, so every throw pays for its own connection
/// setup the same way an independent one-off request would.
#[derive(Debug, Clone)]
pub struct NetworkClient {
    client: Client,
    timeout: Option<Duration>,
}

impl NetworkClient {
    /// Create a new network client without a request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Create a new network client with an optional per-request timeout
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(0);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl HttpClient for NetworkClient {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let parsed = Url::parse(&request.url)
            .map_err(|e| AppError::parse(format!("Invalid URL '{}': {}", request.url, e)))?;

        let response = self.client.get(parsed).send().await?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        if !response.status().is_success() {
            return Err(AppError::http_status(final_url, status_code));
        }

        // The timeout also covers the body, so a stalled transfer is a Timeout
        let body = response.text().await?;

        Ok(HttpResponse {
            status_code,
            body,
            final_url,
        })
    }
}
