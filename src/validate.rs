//! Response validation.
//!
//! All HTTP status classification happens here; resource methods never
//! inspect status codes themselves.

use serde_json::{json, Map, Value};

use crate::connector::HttpResponse;
use crate::error::{ApiError, Error};

/// Statuses accepted when the caller has no narrower set.
pub const DEFAULT_OK_STATUSES: &[u16] = &[200, 201, 202, 204];

/// Assert that the response status is one of `ok_statuses`.
///
/// # Errors
///
/// * 404 → `ApiError::NotFound`
/// * 422 → `ApiError::Validation` with the body's `details` object
/// * anything else → `ApiError::Generic` with the status
///
/// The message is taken from the JSON body's `message` or `error` field
/// when present, otherwise `"http error <code>"`.
pub fn assert_status(response: &HttpResponse, ok_statuses: &[u16]) -> Result<(), Error> {
    let code = response.status;
    if ok_statuses.contains(&code) {
        return Ok(());
    }

    let json = maybe_json(response);
    let message = json
        .as_ref()
        .and_then(|obj| {
            ["message", "error"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))
        })
        .map_or_else(|| format!("http error {code}"), str::to_string);

    let body = response.body.clone();
    let headers = response.headers.clone();

    let error = match code {
        404 => ApiError::NotFound {
            message,
            body,
            headers,
        },
        422 => {
            let details = json
                .as_ref()
                .and_then(|obj| obj.get("details"))
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            ApiError::Validation {
                message,
                details,
                body,
                headers,
            }
        }
        _ => ApiError::Generic {
            message,
            status: Some(code),
            body,
            headers,
        },
    };

    Err(error.into())
}

/// Ensure required keys exist in a decoded JSON object.
///
/// # Errors
///
/// Returns `ApiError::Validation` with message `"missing required keys"` and
/// details `{"missing": [...], "context": context}`.
pub fn require_keys(data: &Map<String, Value>, keys: &[&str], context: &str) -> Result<(), Error> {
    let missing: Vec<&str> = keys
        .iter()
        .copied()
        .filter(|key| !data.contains_key(*key))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    let details = json!({ "missing": missing, "context": context });
    Err(ApiError::Validation {
        message: "missing required keys".to_string(),
        details: details.as_object().cloned().unwrap_or_default(),
        body: None,
        headers: Default::default(),
    }
    .into())
}

/// Decode the response body as a JSON object.
///
/// # Errors
///
/// Returns `ApiError::Generic` carrying the response status when the body is
/// missing, not JSON, or not an object.
pub fn decode_object(response: &HttpResponse, context: &str) -> Result<Map<String, Value>, Error> {
    let parsed = response
        .body
        .as_deref()
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok());

    match parsed {
        Some(Value::Object(obj)) => Ok(obj),
        _ => Err(ApiError::Generic {
            message: format!("invalid JSON from {context}"),
            status: Some(response.status),
            body: response.body.clone(),
            headers: response.headers.clone(),
        }
        .into()),
    }
}

/// Decode JSON only if the content type says it is JSON.
fn maybe_json(response: &HttpResponse) -> Option<Map<String, Value>> {
    let content_type = response.header("content-type")?;
    if !content_type.to_ascii_lowercase().contains("application/json") {
        return None;
    }

    let raw = response.body.as_deref().filter(|b| !b.is_empty())?;
    match serde_json::from_str(raw) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(result: Result<(), Error>) -> ApiError {
        match result {
            Err(Error::Api(e)) => e,
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_passes_on_ok_statuses() {
        let response = HttpResponse::json(200, &json!({"ok": true}));
        assert!(assert_status(&response, DEFAULT_OK_STATUSES).is_ok());

        let created = HttpResponse::json(201, &json!({"status": "ok"}));
        assert!(assert_status(&created, &[200, 201]).is_ok());
    }

    #[test]
    fn test_ok_set_is_exact() {
        let created = HttpResponse::json(201, &json!({"status": "ok"}));
        let error = api_error(assert_status(&created, &[200]));
        assert_eq!(error.status(), Some(201));
    }

    #[test]
    fn test_not_found() {
        let response = HttpResponse::json(404, &json!({"message": "nope"}));
        let error = api_error(assert_status(&response, &[200]));

        assert!(matches!(error, ApiError::NotFound { .. }));
        assert_eq!(error.message(), "nope");
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.body(), Some(r#"{"message":"nope"}"#));
        assert!(error.headers().contains_key("content-type"));
    }

    #[test]
    fn test_validation_details() {
        let response = HttpResponse::json(
            422,
            &json!({"message": "invalid input", "details": {"name": ["can't be blank"]}}),
        );
        let error = api_error(assert_status(&response, &[200]));

        assert!(matches!(error, ApiError::Validation { .. }));
        assert_eq!(error.message(), "invalid input");
        assert!(error.details().is_some_and(|d| d.contains_key("name")));
        assert_eq!(error.violations("name"), vec!["can't be blank"]);
    }

    #[test]
    fn test_validation_without_details() {
        let response = HttpResponse::json(422, &json!({"message": "validation failed"}));
        let error = api_error(assert_status(&response, &[200]));
        assert!(error.details().is_some_and(Map::is_empty));
    }

    #[test]
    fn test_generic_uses_error_field() {
        let response = HttpResponse::json(500, &json!({"error": "boom"}));
        let error = api_error(assert_status(&response, &[200]));

        assert!(matches!(error, ApiError::Generic { .. }));
        assert_eq!(error.message(), "boom");
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_message_skips_non_string() {
        let response = HttpResponse::json(400, &json!({"message": 12, "error": "bad"}));
        assert_eq!(api_error(assert_status(&response, &[200])).message(), "bad");
    }

    #[test]
    fn test_fallback_message_without_json_content_type() {
        let response = HttpResponse::new(503)
            .with_header("content-type", "text/plain")
            .with_body(r#"{"message": "ignored"}"#);
        let error = api_error(assert_status(&response, &[200]));

        assert_eq!(error.message(), "http error 503");
        assert_eq!(error.body(), Some(r#"{"message": "ignored"}"#));
    }

    #[test]
    fn test_content_type_with_charset() {
        let response = HttpResponse::new(404)
            .with_header("Content-Type", "Application/JSON; charset=utf-8")
            .with_body(r#"{"message":"tenant not found"}"#);
        assert_eq!(
            api_error(assert_status(&response, &[200])).message(),
            "tenant not found"
        );
    }

    #[test]
    fn test_unreadable_body() {
        let response = HttpResponse {
            status: 502,
            headers: Default::default(),
            body: None,
        };
        let error = api_error(assert_status(&response, &[200]));
        assert_eq!(error.message(), "http error 502");
        assert_eq!(error.body(), None);
    }

    #[test]
    fn test_require_keys_missing() {
        let data = json!({"status": "ok"});
        let obj = data.as_object().cloned().unwrap_or_default();

        let error = api_error(require_keys(&obj, &["status", "users"], "test"));
        assert_eq!(error.message(), "missing required keys");
        assert_eq!(error.status(), Some(422));

        let details = error.details().cloned().unwrap_or_default();
        assert_eq!(details.get("missing"), Some(&json!(["users"])));
        assert_eq!(details.get("context"), Some(&json!("test")));
    }

    #[test]
    fn test_require_keys_present() {
        let data = json!({"status": "ok", "tenant": {}});
        let obj = data.as_object().cloned().unwrap_or_default();
        assert!(require_keys(&obj, &["status", "tenant"], "tenants.get").is_ok());
    }

    #[test]
    fn test_decode_object() {
        let ok = HttpResponse::json(200, &json!({"status": "ok"}));
        assert_eq!(
            decode_object(&ok, "GET /x").ok().and_then(|o| o.get("status").cloned()),
            Some(json!("ok"))
        );

        let list = HttpResponse::new(200).with_body("[1, 2]");
        let error = decode_object(&list, "GET /x").expect_err("arrays are not objects");
        assert_eq!(error.status(), Some(200));
        assert_eq!(error.to_string(), "invalid JSON from GET /x");

        let garbage = HttpResponse::new(200).with_body("<html>");
        assert!(decode_object(&garbage, "GET /x").is_err());
    }
}
