//! Ed25519 signers for the SweetDate SDK.
//!
//! Application keys are 32-byte Ed25519 seeds, exchanged as unpadded
//! base64url text.
//!
//! # Example
//!
//! ```rust
//! use sweetdate::{Ed25519Signer, Signer};
//!
//! // Generate a new keypair
//! let (signer, public_key) = Ed25519Signer::generate();
//! println!("Public key: {}", public_key);
//!
//! // Sign a message
//! let signature = signer.sign(b"Hello, SweetDate!").unwrap();
//! assert_eq!(signature.len(), 64);
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::{
    Signature as Ed25519Signature, Signer as DalekSigner, SigningKey, Verifier, VerifyingKey,
    SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;

use crate::error::Error;

/// Trait for cryptographic signers.
pub trait Signer: Send + Sync {
    /// Sign a message and return the detached signature bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error>;

    /// Return the public key as unpadded base64url.
    fn public_key(&self) -> String;

    /// Verify a detached signature.
    fn verify(&self, signature: &[u8], message: &[u8]) -> bool;
}

/// Ed25519 signer derived from a 32-byte seed.
pub struct Ed25519Signer {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519Signer {
    fn new(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Generate a new Ed25519 keypair.
    ///
    /// Returns a tuple of (signer, `public_key_b64url`).
    #[must_use]
    pub fn generate() -> (Self, String) {
        let signing_key = SigningKey::generate(&mut OsRng);
        let signer = Self::new(signing_key);
        let public_key = signer.public_key();
        (signer, public_key)
    }

    /// Load a signer from a base64url-encoded 32-byte seed.
    ///
    /// Padding is optional.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the text is not base64url or does
    /// not decode to exactly 32 bytes.
    pub fn from_seed_b64url(seed: &str) -> Result<Self, Error> {
        let bytes = URL_SAFE_NO_PAD
            .decode(seed.trim().trim_end_matches('='))
            .map_err(|e| Error::Configuration(format!("signing seed is not base64url: {e}")))?;

        let seed: [u8; SECRET_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            Error::Configuration(format!(
                "invalid secret seed length for Ed25519: expected {SECRET_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self::from_bytes(&seed))
    }

    /// Load a signer from a raw 32-byte seed.
    #[must_use]
    pub fn from_bytes(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self::new(SigningKey::from_bytes(seed))
    }

    /// Return the raw 32-byte public key.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Return the seed as unpadded base64url, the form the SDK is configured with.
    #[must_use]
    pub fn seed_b64url(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.signing_key.to_bytes())
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        let signature: Ed25519Signature = self.signing_key.sign(message);
        Ok(signature.to_bytes().to_vec())
    }

    fn public_key(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.verifying_key.to_bytes())
    }

    fn verify(&self, signature: &[u8], message: &[u8]) -> bool {
        let Ok(sig_bytes): Result<[u8; 64], _> = signature.try_into() else {
            return false;
        };
        let sig = Ed25519Signature::from_bytes(&sig_bytes);
        self.verifying_key.verify(message, &sig).is_ok()
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ed25519_generate_and_sign() {
        let (signer, public_key) = Ed25519Signer::generate();
        assert_eq!(URL_SAFE_NO_PAD.decode(&public_key).map(|k| k.len()).ok(), Some(32));

        let message = b"test message";
        let signature = signer.sign(message).expect("signing should succeed");

        assert_eq!(signature.len(), 64);
        assert!(signer.verify(&signature, message));
        assert!(!signer.verify(&signature, b"other message"));
    }

    #[test]
    fn test_ed25519_signature_is_deterministic() {
        let signer = Ed25519Signer::from_bytes(&[7u8; 32]);

        let sig1 = signer.sign(b"same").expect("signing should succeed");
        let sig2 = signer.sign(b"same").expect("signing should succeed");

        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_seed_round_trip() {
        let (signer, public_key) = Ed25519Signer::generate();
        let restored =
            Ed25519Signer::from_seed_b64url(&signer.seed_b64url()).expect("seed should load");

        assert_eq!(restored.public_key(), public_key);
    }

    #[test]
    fn test_seed_accepts_padding() {
        let seed = URL_SAFE_NO_PAD.encode([1u8; 32]);
        let padded = format!("{seed}=");

        let a = Ed25519Signer::from_seed_b64url(&seed).expect("unpadded seed should load");
        let b = Ed25519Signer::from_seed_b64url(&padded).expect("padded seed should load");
        assert_eq!(a.public_key_bytes(), b.public_key_bytes());
    }

    #[test]
    fn test_seed_wrong_length() {
        let short = URL_SAFE_NO_PAD.encode([1u8; 16]);
        let err = Ed25519Signer::from_seed_b64url(&short).expect_err("16 bytes must be rejected");
        assert!(matches!(err, Error::Configuration(_)));

        let long = URL_SAFE_NO_PAD.encode([1u8; 64]);
        assert!(matches!(
            Ed25519Signer::from_seed_b64url(&long),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_seed_not_base64url() {
        assert!(matches!(
            Ed25519Signer::from_seed_b64url("not base64!"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_hides_seed() {
        let signer = Ed25519Signer::from_bytes(&[9u8; 32]);
        let debug = format!("{signer:?}");
        assert!(!debug.contains(&signer.seed_b64url()));
    }
}
