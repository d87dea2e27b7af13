//! Client configuration.
//!
//! A [`Config`] is built once and handed to the client; nothing in the
//! request pipeline reads the environment. [`Config::from_env`] is provided
//! for applications that want the conventional `SWEETDATE_*` variables.

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

/// Default base URL for a local SweetDate server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4001";

/// Default per-attempt request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Source of the current time in epoch seconds.
pub trait Clock: Send + Sync {
    /// Current epoch seconds.
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now(&self) -> i64 {
        self()
    }
}

/// What to do when the app id or signing seed is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningPolicy {
    /// Send requests unsigned (health checks, local smoke tests).
    #[default]
    Optional,
    /// Refuse to build a client without both app id and seed.
    Required,
}

/// SweetDate client configuration.
#[derive(Clone)]
pub struct Config {
    /// API base URL without a trailing slash
    pub base_url: String,
    /// Application identifier sent as `sd-app-id`
    pub app_id: Option<String>,
    /// Ed25519 seed, base64url without padding
    pub secret_seed: Option<String>,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Timestamp source for signatures
    pub clock: Arc<dyn Clock>,
    /// Behavior when signing material is missing
    pub signing: SigningPolicy,
}

impl Config {
    /// Create a configuration for `base_url` with no signing material.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id: None,
            secret_seed: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            clock: Arc::new(SystemClock),
            signing: SigningPolicy::default(),
        }
    }

    /// Set the application identifier and signing seed.
    #[must_use]
    pub fn with_credentials(mut self, app_id: &str, secret_seed: &str) -> Self {
        self.app_id = Some(app_id.to_string());
        self.secret_seed = Some(secret_seed.to_string());
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the clock used for signature timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Set the signing policy.
    #[must_use]
    pub fn with_signing(mut self, signing: SigningPolicy) -> Self {
        self.signing = signing;
        self
    }

    /// Current epoch seconds according to the configured clock.
    #[must_use]
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `SWEETDATE_BASE_URL` (or `SD_BASE_URL`) - default `http://localhost:4001`
    /// * `SWEETDATE_APP_ID` (or `SD_APP_ID`) - application identifier
    /// * `SWEETDATE_SK_B64URL` - Ed25519 seed, base64url
    /// * `SWEETDATE_TIMEOUT_MS` - default 10000
    /// * `SWEETDATE_REQUIRE_SIGNATURE` - `1` or `true` for [`SigningPolicy::Required`]
    ///
    /// Empty variables count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let base_url = get("SWEETDATE_BASE_URL")
            .or_else(|| get("SD_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_ms = get("SWEETDATE_TIMEOUT_MS")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|ms| *ms > 0)
            .map_or(DEFAULT_TIMEOUT_MS, |ms| ms.unsigned_abs());

        let signing = match get("SWEETDATE_REQUIRE_SIGNATURE").as_deref() {
            Some("1" | "true" | "TRUE" | "yes") => SigningPolicy::Required,
            _ => SigningPolicy::Optional,
        };

        Self {
            app_id: get("SWEETDATE_APP_ID").or_else(|| get("SD_APP_ID")),
            secret_seed: get("SWEETDATE_SK_B64URL"),
            timeout: Duration::from_millis(timeout_ms),
            signing,
            ..Self::new(&base_url)
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("secret_seed", &self.secret_seed.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("signing", &self.signing)
            .finish_non_exhaustive()
    }
}
