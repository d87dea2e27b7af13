//! Data model types for the SweetDate SDK.

pub mod tenants;

// Re-exports
pub use tenants::{Tenant, TenantListParams, TenantPage};
