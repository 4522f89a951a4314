//! Response envelope handling.
//!
//! Successful responses wrap their payload as `{"data": ..., "meta": ...}`;
//! failures carry a human-readable `detail`.

use serde_json::Value;

/// Return the `data` member of an envelope, or the whole body when there is
/// no non-null `data` member.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Extract the server's error message from a failed response body.
///
/// Parsing and lookup are separate steps that both fall through to `None`:
/// an unparsable body, a non-object body, a missing or empty `detail` all
/// mean "no detail". Structured details (validation error lists) are
/// rendered as compact JSON.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: Value = serde_json::from_slice(body).ok()?;
    match parsed.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null | Value::Bool(false) => None,
        other => Some(other.to_string()),
    }
}
