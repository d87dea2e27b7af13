//! SignatureV1 request signing.
//!
//! The canonical string is five newline-separated fields with no trailing
//! newline:
//!
//! ```text
//! v1
//! <METHOD>
//! <path?query>
//! <timestamp>
//! -
//! ```
//!
//! The last field is reserved for a body hash and is always `-` in `v1`.
//! The signature is a detached Ed25519 signature over those bytes, sent as
//! unpadded base64url.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::config::Clock;
use crate::error::Error;
use crate::signers::{Ed25519Signer, Signer};

/// Header carrying the application identifier.
pub const HEADER_APP_ID: &str = "sd-app-id";
/// Header carrying the signing timestamp in epoch seconds.
pub const HEADER_TIMESTAMP: &str = "sd-timestamp";
/// Header carrying the base64url signature.
pub const HEADER_SIGNATURE: &str = "sd-signature";

/// Protocol version tag, first line of the canonical string.
pub const SIGNATURE_VERSION: &str = "v1";

/// Placeholder for the unused body-hash field.
const BODY_HASH_PLACEHOLDER: &str = "-";

/// Build the canonical string for a request.
#[must_use]
pub fn canonical_string(method: &str, path_with_query: &str, timestamp: i64) -> String {
    format!(
        "{SIGNATURE_VERSION}\n{}\n{path_with_query}\n{timestamp}\n{BODY_HASH_PLACEHOLDER}",
        method.to_uppercase()
    )
}

/// The three SignatureV1 headers for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    pub app_id: String,
    pub timestamp: i64,
    pub signature: String,
}

impl SignatureHeaders {
    /// Header name/value pairs in wire order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            (HEADER_APP_ID.to_string(), self.app_id.clone()),
            (HEADER_TIMESTAMP.to_string(), self.timestamp.to_string()),
            (HEADER_SIGNATURE.to_string(), self.signature.clone()),
        ]
    }
}

/// Signs requests on behalf of one application.
#[derive(Debug)]
pub struct RequestSigner {
    app_id: String,
    signer: Ed25519Signer,
}

impl RequestSigner {
    /// Create a signer from an app id and a base64url seed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the seed is not a valid 32-byte
    /// base64url value.
    pub fn new(app_id: &str, seed_b64url: &str) -> Result<Self, Error> {
        Ok(Self::with_signer(
            app_id,
            Ed25519Signer::from_seed_b64url(seed_b64url)?,
        ))
    }

    /// Create a signer from an already loaded key.
    #[must_use]
    pub fn with_signer(app_id: &str, signer: Ed25519Signer) -> Self {
        Self {
            app_id: app_id.to_string(),
            signer,
        }
    }

    /// Get the app id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Get the underlying key.
    #[must_use]
    pub fn signer(&self) -> &Ed25519Signer {
        &self.signer
    }

    /// Sign a request at an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn sign_at(
        &self,
        method: &str,
        path_with_query: &str,
        timestamp: i64,
    ) -> Result<SignatureHeaders, Error> {
        let canonical = canonical_string(method, path_with_query, timestamp);
        let signature = self.signer.sign(canonical.as_bytes())?;

        Ok(SignatureHeaders {
            app_id: self.app_id.clone(),
            timestamp,
            signature: URL_SAFE_NO_PAD.encode(signature),
        })
    }

    /// Sign a request at the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn signature_headers(
        &self,
        method: &str,
        path_with_query: &str,
        clock: &dyn Clock,
    ) -> Result<SignatureHeaders, Error> {
        self.sign_at(method, path_with_query, clock.now())
    }

    /// Check a signature produced by this signer.
    #[must_use]
    pub fn verify(&self, method: &str, path_with_query: &str, headers: &SignatureHeaders) -> bool {
        let Ok(signature) = URL_SAFE_NO_PAD.decode(&headers.signature) else {
            return false;
        };
        let canonical = canonical_string(method, path_with_query, headers.timestamp);
        self.signer.verify(&signature, canonical.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;

    fn test_signer() -> RequestSigner {
        RequestSigner::with_signer("app-123", Ed25519Signer::from_bytes(&[42u8; 32]))
    }

    #[test]
    fn test_canonical_string_exact() {
        assert_eq!(
            canonical_string("get", "/api/v1/tenants?limit=25&offset=0", 1_700_000_000),
            "v1\nGET\n/api/v1/tenants?limit=25&offset=0\n1700000000\n-"
        );
    }

    #[test]
    fn test_signature_headers() {
        let signer = test_signer();
        let headers = signer
            .signature_headers("post", "/api/v1/tenants", &FixedClock(1_700_000_000))
            .expect("signing should succeed");

        assert_eq!(headers.app_id, "app-123");
        assert_eq!(headers.timestamp, 1_700_000_000);
        assert!(!headers.signature.contains('='));
        assert!(!headers.signature.contains('+'));
        assert!(!headers.signature.contains('/'));
        assert_eq!(
            URL_SAFE_NO_PAD.decode(&headers.signature).map(|s| s.len()).ok(),
            Some(64)
        );

        let pairs = headers.to_pairs();
        assert_eq!(pairs[0], ("sd-app-id".to_string(), "app-123".to_string()));
        assert_eq!(pairs[1], ("sd-timestamp".to_string(), "1700000000".to_string()));
        assert_eq!(pairs[2].0, "sd-signature");
    }

    #[test]
    fn test_signature_is_deterministic() {
        let signer = test_signer();
        let a = signer.sign_at("GET", "/api/v1/tenants", 100).expect("sign");
        let b = signer.sign_at("get", "/api/v1/tenants", 100).expect("sign");
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_changes_with_inputs() {
        let signer = test_signer();
        let base = signer.sign_at("GET", "/api/v1/tenants", 100).expect("sign");

        let other_method = signer.sign_at("DELETE", "/api/v1/tenants", 100).expect("sign");
        let other_path = signer.sign_at("GET", "/api/v1/tenants/1", 100).expect("sign");
        let other_time = signer.sign_at("GET", "/api/v1/tenants", 101).expect("sign");
        let other_key = RequestSigner::with_signer("app-123", Ed25519Signer::from_bytes(&[1u8; 32]))
            .sign_at("GET", "/api/v1/tenants", 100)
            .expect("sign");

        assert_ne!(base.signature, other_method.signature);
        assert_ne!(base.signature, other_path.signature);
        assert_ne!(base.signature, other_time.signature);
        assert_ne!(base.signature, other_key.signature);
    }

    #[test]
    fn test_verify() {
        let signer = test_signer();
        let headers = signer.sign_at("PUT", "/api/v1/tenants/t-1", 5).expect("sign");

        assert!(signer.verify("PUT", "/api/v1/tenants/t-1", &headers));
        assert!(!signer.verify("PUT", "/api/v1/tenants/t-2", &headers));

        let stale = SignatureHeaders {
            timestamp: 6,
            ..headers
        };
        assert!(!signer.verify("PUT", "/api/v1/tenants/t-1", &stale));
    }

    #[test]
    fn test_new_rejects_bad_seed() {
        assert!(matches!(
            RequestSigner::new("app", "dG9vLXNob3J0"),
            Err(Error::Configuration(_))
        ));
    }
}
