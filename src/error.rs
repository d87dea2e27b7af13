//! Error types for the SweetDate SDK.
//!
//! Every failure the SDK reports is one of a closed set of variants:
//! configuration problems, request-body serialization failures, or an
//! [`ApiError`] classified from the HTTP exchange.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

/// Response headers keyed by lowercase header name.
pub type ResponseHeaders = BTreeMap<String, Vec<String>>;

/// Main error type for the SweetDate SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or missing signing material, raised before any network call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A request body could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SweetDate API error
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// Returns the API error, if this is one.
    #[must_use]
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this error is a 404 from the API.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(ApiError::NotFound { .. }))
    }

    /// HTTP status that produced this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.as_api().and_then(ApiError::status)
    }
}

/// Typed errors for SweetDate API responses.
///
/// `NotFound` and `Validation` have fixed statuses (404 and 422), so the
/// status reported by [`ApiError::status`] always matches the HTTP status
/// that produced the error.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Any other non-success response, a malformed success payload, or
    /// request that failed before any response (`status` is `None` then).
    #[error("{message}")]
    Generic {
        message: String,
        status: Option<u16>,
        body: Option<String>,
        headers: ResponseHeaders,
    },

    /// Raised when a resource is not found (404).
    #[error("{message}")]
    NotFound {
        message: String,
        body: Option<String>,
        headers: ResponseHeaders,
    },

    /// Raised on validation errors (422).
    ///
    /// `details` maps field names to lists of violation messages, or holds
    /// `{"missing": [...], "context": "..."}` for missing response keys.
    #[error("{message}")]
    Validation {
        message: String,
        details: Map<String, Value>,
        body: Option<String>,
        headers: ResponseHeaders,
    },
}

impl ApiError {
    /// Build a generic error that did not come from an HTTP response.
    pub(crate) fn local(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
            status: None,
            body: None,
            headers: ResponseHeaders::new(),
        }
    }

    /// Get the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Generic { message, .. }
            | Self::NotFound { message, .. }
            | Self::Validation { message, .. } => message,
        }
    }

    /// Get the HTTP status code.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Generic { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            Self::Validation { .. } => Some(422),
        }
    }

    /// Get the raw response body, when one was read.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Generic { body, .. }
            | Self::NotFound { body, .. }
            | Self::Validation { body, .. } => body.as_deref(),
        }
    }

    /// Get the response headers.
    #[must_use]
    pub fn headers(&self) -> &ResponseHeaders {
        match self {
            Self::Generic { headers, .. }
            | Self::NotFound { headers, .. }
            | Self::Validation { headers, .. } => headers,
        }
    }

    /// Get the structured validation details (`None` for other variants).
    #[must_use]
    pub fn details(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Validation { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Violation messages reported for a single field.
    #[must_use]
    pub fn violations(&self, field: &str) -> Vec<&str> {
        self.details()
            .and_then(|d| d.get(field))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_statuses() {
        let not_found = ApiError::NotFound {
            message: "nope".to_string(),
            body: None,
            headers: ResponseHeaders::new(),
        };
        assert_eq!(not_found.status(), Some(404));
        assert!(not_found.details().is_none());

        let validation = ApiError::Validation {
            message: "invalid".to_string(),
            details: Map::new(),
            body: None,
            headers: ResponseHeaders::new(),
        };
        assert_eq!(validation.status(), Some(422));
        assert_eq!(validation.details(), Some(&Map::new()));
    }

    #[test]
    fn test_local_error_has_no_status() {
        let error = ApiError::local("connection refused");
        assert_eq!(error.status(), None);
        assert_eq!(error.message(), "connection refused");
        assert!(error.body().is_none());
        assert!(error.headers().is_empty());
    }

    #[test]
    fn test_violations() {
        let details = json!({"name": ["can't be blank", "is too short"], "count": 3});
        let error = ApiError::Validation {
            message: "validation failed".to_string(),
            details: details.as_object().cloned().unwrap_or_default(),
            body: None,
            headers: ResponseHeaders::new(),
        };

        assert_eq!(error.violations("name"), vec!["can't be blank", "is too short"]);
        assert!(error.violations("count").is_empty());
        assert!(error.violations("email").is_empty());
    }

    #[test]
    fn test_error_wrapping() {
        let error: Error = ApiError::NotFound {
            message: "not found".to_string(),
            body: Some("{}".to_string()),
            headers: ResponseHeaders::new(),
        }
        .into();

        assert!(error.is_not_found());
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.to_string(), "not found");

        let config = Error::Configuration("bad seed".to_string());
        assert!(!config.is_not_found());
        assert_eq!(config.status(), None);
    }
}
