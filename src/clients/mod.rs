//! Resource clients for the SweetDate SDK.

pub mod tenants;

// Re-exports
pub use tenants::TenantsClient;
