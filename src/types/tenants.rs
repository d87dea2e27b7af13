//! Tenant data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant ID (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// When the tenant was inserted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,
    /// When the tenant was last updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Creation time, reported by some server versions instead of `inserted_at`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of tenants, ordered by name ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantPage {
    pub limit: u32,
    pub offset: u32,
    #[serde(default)]
    pub tenants: Vec<Tenant>,
}

/// Parameters for listing tenants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantListParams {
    /// Maximum number of items (server accepts 1..=100)
    pub limit: u32,
    /// Number of items to skip
    pub offset: u32,
    /// Optional name filter
    pub q: Option<String>,
}

impl Default for TenantListParams {
    fn default() -> Self {
        Self {
            limit: 25,
            offset: 0,
            q: None,
        }
    }
}

impl TenantListParams {
    /// Query pairs in wire order.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(q) = &self.q {
            query.push(("q", q.clone()));
        }
        query
    }
}
