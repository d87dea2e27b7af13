//! HTTP transport for the SweetDate SDK.
//!
//! Composes headers, attaches SignatureV1 signatures, sends through a
//! [`Connector`] and retries transport-level failures with exponential
//! backoff. HTTP responses of any status are returned as-is; classifying
//! them is the job of [`crate::validate`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{Clock, Config, SigningPolicy};
use crate::connector::{Connector, HttpRequest, HttpResponse};
use crate::error::{ApiError, Error};
use crate::signing::RequestSigner;
use crate::validate::{assert_status, decode_object, require_keys};

/// Configuration for automatic retry behavior.
///
/// Only transport failures are retried; HTTP error statuses never are.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_backoff: Duration,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(150),
            backoff_factor: 2,
        }
    }
}

impl RetryConfig {
    /// Delay to wait after failed attempt number `attempt` (0-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(self.backoff_factor.saturating_pow(attempt))
    }
}

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers. SignatureV1 headers replace any with the same name.
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub json: Option<Value>,
    /// Skip SignatureV1 headers even when credentials are configured
    pub unsigned: bool,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Send this request without SignatureV1 headers.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Set the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if `body` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        self.json = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// HTTP transport layer with automatic signing and retry logic.
pub struct HttpTransport {
    connector: Arc<dyn Connector>,
    signer: Option<RequestSigner>,
    clock: Arc<dyn Clock>,
    retry_config: RetryConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// Signing material is resolved here so configuration problems surface
    /// before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the seed is invalid, or if the
    /// signing policy is `Required` and the app id or seed is missing.
    pub fn new(
        config: &Config,
        connector: Arc<dyn Connector>,
        retry_config: Option<RetryConfig>,
    ) -> Result<Self, Error> {
        let app_id = config.app_id.as_deref().filter(|s| !s.is_empty());
        let seed = config.secret_seed.as_deref().filter(|s| !s.is_empty());

        let signer = match (app_id, seed) {
            (Some(app_id), Some(seed)) => Some(RequestSigner::new(app_id, seed)?),
            (app_id, seed) => {
                if config.signing == SigningPolicy::Required {
                    let missing = [("app id", app_id.is_none()), ("signing seed", seed.is_none())]
                        .iter()
                        .filter(|(_, absent)| *absent)
                        .map(|(name, _)| *name)
                        .collect::<Vec<_>>()
                        .join(" and ");
                    return Err(Error::Configuration(format!(
                        "request signing is required but {missing} is not configured"
                    )));
                }
                // Seed validity is checked even when it cannot be used.
                if let Some(seed) = seed {
                    crate::signers::Ed25519Signer::from_seed_b64url(seed)?;
                }
                None
            }
        };

        Ok(Self {
            connector,
            signer,
            clock: Arc::clone(&config.clock),
            retry_config: retry_config.unwrap_or_default(),
        })
    }

    /// Whether requests from this transport are signed.
    #[must_use]
    pub fn is_signing(&self) -> bool {
        self.signer.is_some()
    }

    /// Get the request signer, if configured.
    #[must_use]
    pub fn signer(&self) -> Option<&RequestSigner> {
        self.signer.as_ref()
    }

    /// Get the retry configuration.
    #[must_use]
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Perform a request against a path that begins with `/`.
    ///
    /// Returns the raw response for any HTTP status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Generic` without a status if the path does not
    /// start with `/`, if the connector cannot build the request (not
    /// retried), or if every attempt failed at the transport level.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, Error> {
        let method = method.to_uppercase();
        if !path.starts_with('/') {
            return Err(ApiError::local("path must start with \"/\"").into());
        }

        let mut last_error = None;

        for attempt in 0..self.retry_config.max_attempts.max(1) {
            if attempt > 0 {
                tokio::time::sleep(self.retry_config.backoff(attempt - 1)).await;
            }

            let request = HttpRequest {
                method: method.clone(),
                path: path.to_string(),
                headers: self.build_headers(&method, path, &options)?,
                body: options.json.clone(),
            };

            tracing::debug!(
                method = %request.method,
                path = %request.path,
                attempt = attempt + 1,
                signed = self.signer.is_some() && !options.unsigned,
                "sending SweetDate request"
            );

            match self.connector.send(&request).await {
                Ok(response) => {
                    tracing::debug!(status = response.status, "SweetDate response received");
                    return Ok(response);
                }
                Err(e) if !e.is_retryable() => {
                    tracing::warn!("SweetDate {} {} cannot be sent: {}", method, path, e);
                    return Err(ApiError::local(e.message()).into());
                }
                Err(e) => {
                    tracing::warn!(
                        "SweetDate {} {} attempt {} failed: {}",
                        method,
                        path,
                        attempt + 1,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        let message = last_error.map_or_else(
            || "No response received".to_string(),
            |e| e.message().to_string(),
        );
        Err(ApiError::local(message).into())
    }

    /// Perform a request and decode a JSON object response.
    ///
    /// # Errors
    ///
    /// Returns the typed error from [`assert_status`], a generic error for a
    /// malformed body, or a validation error when `required_keys` are missing.
    pub async fn request_json(
        &self,
        method: &str,
        path: &str,
        options: RequestOptions,
        ok_statuses: &[u16],
        required_keys: &[&str],
        context: &str,
    ) -> Result<(HttpResponse, Map<String, Value>), Error> {
        let response = self.request(method, path, options).await?;
        assert_status(&response, ok_statuses)?;

        let json = decode_object(&response, &format!("{} {path}", method.to_uppercase()))?;
        require_keys(&json, required_keys, context)?;

        Ok((response, json))
    }

    /// Caller headers followed by signature headers, which win on conflict.
    fn build_headers(
        &self,
        method: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Vec<(String, String)>, Error> {
        let extra = &options.headers;
        let signer = match &self.signer {
            Some(signer) if !options.unsigned => signer,
            _ => return Ok(extra.clone()),
        };

        let signature = signer
            .signature_headers(method, path, self.clock.as_ref())?
            .to_pairs();

        let mut headers: Vec<(String, String)> = extra
            .iter()
            .filter(|(name, _)| {
                !signature
                    .iter()
                    .any(|(sig_name, _)| sig_name.eq_ignore_ascii_case(name))
            })
            .cloned()
            .collect();
        headers.extend(signature);
        Ok(headers)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("signer", &self.signer)
            .field("retry_config", &self.retry_config)
            .finish_non_exhaustive()
    }
}
