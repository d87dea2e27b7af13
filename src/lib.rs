//! SweetDate SDK for Rust
//!
//! Client for the SweetDate HTTP API. Requests are signed with
//! SignatureV1 (detached Ed25519 over a canonical request string), retried
//! on transport failures, and their responses are mapped to typed errors.
//!
//! # Quick Start
//!
//! ```rust
//! use sweetdate::signing::canonical_string;
//! use sweetdate::{path, with_query, Ed25519Signer, Signer};
//!
//! let p = with_query(&path("/api/v1/tenants/:id", [("id", "t 1")]), [("limit", 25)]);
//! assert_eq!(p, "/api/v1/tenants/t%201?limit=25");
//!
//! let canonical = canonical_string("get", &p, 1_700_000_000);
//! assert_eq!(canonical, "v1\nGET\n/api/v1/tenants/t%201?limit=25\n1700000000\n-");
//!
//! let (signer, _public_key) = Ed25519Signer::generate();
//! let signature = signer.sign(canonical.as_bytes()).unwrap();
//! assert!(signer.verify(&signature, canonical.as_bytes()));
//! ```

pub mod client;
pub mod clients;
pub mod config;
pub mod connector;
pub mod error;
pub mod path;
pub mod signers;
pub mod signing;
pub mod testing;
pub mod transport;
pub mod types;
pub mod validate;

// Re-exports
pub use client::SweetDateClient;
pub use clients::TenantsClient;
pub use config::{Clock, Config, FixedClock, SigningPolicy, SystemClock};
pub use connector::{Connector, ConnectorError, HttpRequest, HttpResponse, ReqwestConnector};
pub use error::{ApiError, Error, ResponseHeaders};
pub use path::{path, with_query};
pub use signers::{Ed25519Signer, Signer};
pub use signing::{canonical_string, RequestSigner, SignatureHeaders};
pub use transport::{HttpTransport, RequestOptions, RetryConfig};
pub use types::{Tenant, TenantListParams, TenantPage};
pub use validate::{assert_status, decode_object, require_keys, DEFAULT_OK_STATUSES};
