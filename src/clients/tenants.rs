//! Tenants resource client.
//!
//! Every endpoint answers `{"status": "ok", "tenant": {...}}` on success and
//! `{"status": "error", "message": "...", "details"?: {...}}` on failure.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::connector::HttpResponse;
use crate::error::{ApiError, Error};
use crate::path::{path, with_query};
use crate::transport::{HttpTransport, RequestOptions};
use crate::types::{Tenant, TenantListParams, TenantPage};

const TENANTS_PATH: &str = "/api/v1/tenants";
const TENANT_PATH: &str = "/api/v1/tenants/:id";

/// Client for tenant operations.
pub struct TenantsClient {
    transport: Arc<HttpTransport>,
}

impl TenantsClient {
    /// Create a new tenants client.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// List tenants ordered by name ascending.
    ///
    /// `GET /api/v1/tenants?limit=&offset=`
    ///
    /// # Errors
    ///
    /// Returns a typed API error for non-200 responses or a payload without
    /// `status`.
    pub async fn list(&self, params: &TenantListParams) -> Result<TenantPage, Error> {
        let path = with_query(TENANTS_PATH, params.to_query());

        let (response, mut json) = self
            .transport
            .request_json("GET", &path, RequestOptions::new(), &[200], &["status"], "tenants.list")
            .await?;

        // Pages arrive either wrapped in `result` or flattened next to `status`.
        let page = match json.remove("result") {
            Some(result @ Value::Object(_)) => result,
            _ => Value::Object(json),
        };
        from_payload(&response, page, "tenants.list")
    }

    /// Get a single tenant by ID.
    ///
    /// `GET /api/v1/tenants/:id`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the tenant does not exist.
    pub async fn get(&self, id: &str) -> Result<Tenant, Error> {
        let path = path(TENANT_PATH, [("id", id)]);
        self.tenant_request("GET", &path, RequestOptions::new(), &[200], "tenants.get")
            .await
    }

    /// Create a new tenant.
    ///
    /// `POST /api/v1/tenants`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` with per-field details if the name is
    /// rejected.
    pub async fn create(&self, name: &str) -> Result<Tenant, Error> {
        let options = RequestOptions::new().json(&json!({ "name": name }))?;
        self.tenant_request("POST", TENANTS_PATH, options, &[200, 201], "tenants.create")
            .await
    }

    /// Rename an existing tenant.
    ///
    /// `PUT /api/v1/tenants/:id`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` or `ApiError::Validation`.
    pub async fn update(&self, id: &str, name: &str) -> Result<Tenant, Error> {
        let path = path(TENANT_PATH, [("id", id)]);
        let options = RequestOptions::new().json(&json!({ "name": name }))?;
        self.tenant_request("PUT", &path, options, &[200], "tenants.update")
            .await
    }

    /// Delete a tenant, returning the deleted record.
    ///
    /// `DELETE /api/v1/tenants/:id`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the tenant does not exist.
    pub async fn delete(&self, id: &str) -> Result<Tenant, Error> {
        let path = path(TENANT_PATH, [("id", id)]);
        self.tenant_request("DELETE", &path, RequestOptions::new(), &[200], "tenants.delete")
            .await
    }

    async fn tenant_request(
        &self,
        method: &str,
        path: &str,
        options: RequestOptions,
        ok_statuses: &[u16],
        context: &str,
    ) -> Result<Tenant, Error> {
        let (response, mut json) = self
            .transport
            .request_json(method, path, options, ok_statuses, &["status", "tenant"], context)
            .await?;

        let tenant = json.remove("tenant").unwrap_or(Value::Null);
        from_payload(&response, tenant, context)
    }
}

/// Decode part of a response, reporting mismatches as a generic API error.
fn from_payload<T: DeserializeOwned>(
    response: &HttpResponse,
    value: Value,
    context: &str,
) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| {
        ApiError::Generic {
            message: format!("unexpected payload from {context}: {e}"),
            status: Some(response.status),
            body: response.body.clone(),
            headers: response.headers.clone(),
        }
        .into()
    })
}
