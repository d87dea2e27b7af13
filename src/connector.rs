//! HTTP connector abstraction.
//!
//! A [`Connector`] performs exactly one HTTP exchange and reports failures
//! as [`ConnectorError`]. HTTP error statuses are ordinary responses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;

use crate::error::{Error, ResponseHeaders};

/// A failed exchange; no HTTP response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// Connection refused, timeout, DNS failure
    #[error("{0}")]
    Transport(String),

    /// The request could not be built (bad method, bad header value)
    #[error("{0}")]
    InvalidRequest(String),
}

impl ConnectorError {
    /// Whether sending the same request again could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Transport(message) | Self::InvalidRequest(message) => message,
        }
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Self::InvalidRequest(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// An outgoing request, relative to the connector's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Uppercase HTTP method
    pub method: String,
    /// Path plus query string, exactly as signed
    pub path: String,
    /// Header name/value pairs in send order
    pub headers: Vec<(String, String)>,
    /// Optional JSON body
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received HTTP response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Headers keyed by lowercase name
    pub headers: ResponseHeaders,
    /// Body text; `None` if the body could not be read
    pub body: Option<String>,
}

impl HttpResponse {
    /// Create an empty response with the given status.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: ResponseHeaders::new(),
            body: Some(String::new()),
        }
    }

    /// Create a JSON response.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    /// Add a header value.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// All values of a header joined with `", "`, or `None` if absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|values| values.join(", "))
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one HTTP request.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Perform the exchange.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError` only when no HTTP response was received.
    /// Requests that can never be sent are `ConnectorError::InvalidRequest`.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ConnectorError>;
}

/// [`Connector`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestConnector {
    base_url: String,
    client: Client,
}

impl ReqwestConnector {
    /// Create a connector for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Connector for ReqwestConnector {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ConnectorError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| {
                ConnectorError::InvalidRequest(format!("invalid method {}: {e}", request.method))
            })?;
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.client.request(method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let mut headers = ResponseHeaders::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let body = match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Failed to read response body ({status}): {e}");
                None
            }
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
