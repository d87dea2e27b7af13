//! Path templating and query-string encoding.
//!
//! Supports both `:id` and `{id}` placeholder styles.
//!
//! # Example
//!
//! ```rust
//! use sweetdate::path::{path, with_query};
//!
//! let p = path("/api/v1/users/{uid}", [("uid", "u 2")]);
//! assert_eq!(p, "/api/v1/users/u%202");
//!
//! let q = with_query("/api/v1/users?limit=10", [("offset", 10)]);
//! assert_eq!(q, "/api/v1/users?limit=10&offset=10");
//! ```

use std::fmt::Display;

/// Build a path from a template with placeholders.
///
/// Each `(name, value)` pair replaces every `:name` and `{name}` with the
/// percent-encoded value, in the order given. Placeholders with no matching
/// parameter are left as-is. The result always starts with exactly one `/`.
pub fn path<I, K, V>(template: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let mut out = template.to_string();

    for (key, value) in params {
        let key = key.as_ref();
        let encoded = urlencoding::encode(&value.to_string()).into_owned();
        out = out.replace(&format!(":{key}"), &encoded);
        out = out.replace(&format!("{{{key}}}"), &encoded);
    }

    format!("/{}", out.trim_start_matches('/'))
}

/// Append query parameters to a path.
///
/// Keys and values use RFC 3986 encoding (a space becomes `%20`, never `+`).
/// Appends with `&` when the path already carries a query string.
pub fn with_query<I, K, V>(path: &str, query: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let qs = query
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key.as_ref()),
                urlencoding::encode(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if qs.is_empty() {
        return path.to_string();
    }

    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}{qs}")
}
