//! Response normalization.
//!
//! Every call funnels its raw response through [`normalize`], so callers get
//! either decoded JSON or a single [`GitHubError`] and never branch on status
//! codes themselves. A 2xx payload carrying a GraphQL `errors` array is a
//! failure too.

use crate::errors::{GitHubError, GitHubResult, RateLimitInfo};
use crate::transport::HttpResponse;
use chrono::DateTime;
use serde_json::Value;

/// Converts a raw response into decoded JSON or an error.
pub fn normalize(response: HttpResponse) -> GitHubResult<Value> {
    if response.is_success() {
        let value = decode_body(&response)?;

        if let Some(errors) = value.as_object().and_then(|obj| obj.get("errors")) {
            let mut error = GitHubError::query(graphql_error_message(errors));
            if let Some(id) = response.request_id() {
                error = error.with_request_id(id);
            }
            return Err(error.with_status(response.status));
        }

        return Ok(value);
    }

    let rate_limit = extract_rate_limit(&response);
    let body = String::from_utf8_lossy(&response.body).into_owned();
    let mut error = GitHubError::from_response(
        response.status,
        body,
        response.request_id().map(String::from),
    );
    if let Some(info) = rate_limit {
        error = error.with_rate_limit(info);
    }

    Err(error)
}

/// Decodes a 2xx body. An empty body (204 No Content) decodes to `null`.
fn decode_body(response: &HttpResponse) -> GitHubResult<Value> {
    if response.body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&response.body).map_err(|e| {
        GitHubError::deserialization(format!("Failed to deserialize response: {}", e))
            .with_status(response.status)
    })
}

/// Builds `Error 1: <message>.\nError 2: <message>` from a GraphQL error list.
///
/// An entry without a `message` string is rendered as its JSON text. A
/// non-array `errors` value counts as a single entry.
pub fn graphql_error_message(errors: &Value) -> String {
    let entries: Vec<&Value> = match errors {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let message = entry
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| entry.to_string());
            format!("Error {}: {}", index + 1, message)
        })
        .collect::<Vec<_>>()
        .join(".\n")
}

/// Reads the `x-ratelimit-*` headers, if all of them are present.
pub fn extract_rate_limit(response: &HttpResponse) -> Option<RateLimitInfo> {
    let limit = response.get_header("x-ratelimit-limit")?.parse().ok()?;
    let remaining = response.get_header("x-ratelimit-remaining")?.parse().ok()?;
    let reset_timestamp: i64 = response.get_header("x-ratelimit-reset")?.parse().ok()?;
    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;
    let resource = response.get_header("x-ratelimit-resource").map(String::from);

    Some(RateLimitInfo {
        limit,
        remaining,
        reset_at,
        resource,
    })
}
