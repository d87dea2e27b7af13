//! SweetDate SDK main client.
//!
//! Provides the primary interface for interacting with the SweetDate API.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::TenantsClient;
use crate::config::Config;
use crate::connector::{Connector, ReqwestConnector};
use crate::error::Error;
use crate::transport::{HttpTransport, RequestOptions, RetryConfig};

/// Health check endpoint; served without authentication.
pub const HEALTHZ_PATH: &str = "/api/v1/healthz";

/// Main client for interacting with the SweetDate API.
///
/// Cheap to share: wrap it in an `Arc` and use it from any number of tasks.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> Result<(), sweetdate::Error> {
/// use sweetdate::{Config, SweetDateClient, TenantListParams};
///
/// let config = Config::new("http://localhost:4001")
///     .with_credentials("my-app", "c3dlZXRkYXRlLWV4YW1wbGUtc2VlZC0zMi1ieXRlcyE");
/// let client = SweetDateClient::new(config)?;
///
/// let page = client.tenants().list(&TenantListParams::default()).await?;
/// for tenant in page.tenants {
///     println!("{} {}", tenant.id, tenant.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SweetDateClient {
    config: Config,
    transport: Arc<HttpTransport>,
    tenants: TenantsClient,
}

impl SweetDateClient {
    /// Create a client that talks HTTP through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for invalid signing material or if the
    /// HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, Error> {
        let connector = Arc::new(ReqwestConnector::new(&config.base_url, config.timeout)?);
        Self::with_connector(config, connector, None)
    }

    /// Create a client from `SWEETDATE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Same as [`SweetDateClient::new`].
    pub fn from_env() -> Result<Self, Error> {
        Self::new(Config::from_env())
    }

    /// Create a client over a custom connector.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for invalid signing material.
    pub fn with_connector(
        config: Config,
        connector: Arc<dyn Connector>,
        retry_config: Option<RetryConfig>,
    ) -> Result<Self, Error> {
        let transport = Arc::new(HttpTransport::new(&config, connector, retry_config)?);

        Ok(Self {
            config,
            tenants: TenantsClient::new(Arc::clone(&transport)),
            transport,
        })
    }

    /// Check server health.
    ///
    /// `GET /api/v1/healthz` is always sent unsigned.
    ///
    /// # Errors
    ///
    /// Returns a typed API error for a non-2xx response.
    pub async fn healthz(&self) -> Result<Map<String, Value>, Error> {
        let (_, json) = self
            .transport
            .request_json(
                "GET",
                HEALTHZ_PATH,
                RequestOptions::new().unsigned(),
                crate::validate::DEFAULT_OK_STATUSES,
                &[],
                "healthz",
            )
            .await?;
        Ok(json)
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the underlying HTTP transport (for endpoints without a wrapper).
    #[must_use]
    pub fn transport(&self) -> &Arc<HttpTransport> {
        &self.transport
    }

    /// Get the tenants client.
    #[must_use]
    pub fn tenants(&self) -> &TenantsClient {
        &self.tenants
    }
}
