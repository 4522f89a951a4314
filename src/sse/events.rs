//! SSE event types and definitions
//!
//! Contains the decoded [`StreamEvent`] and its [`Payload`], plus the
//! line classification used while parsing an event block.

use serde::Serialize;
use serde_json::Value;

/// Event name used when a block carries no `event:` line.
pub const DEFAULT_EVENT_NAME: &str = "message";

/// Payload of a decoded event.
///
/// Data that parses as JSON is kept as a [`Value`]; anything else is
/// delivered as the raw joined text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Interpret joined `data:` lines, falling back to raw text.
    pub fn from_data(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(raw),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Json(_) => None,
            Payload::Text(text) => Some(text),
        }
    }

    /// Convert into a JSON value; text payloads become JSON strings.
    pub fn into_json(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        }
    }
}

/// One complete event decoded from the stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamEvent {
    /// Event name from the last `event:` line, or `message` without one
    #[serde(rename = "event")]
    pub name: String,
    /// Parsed payload from the joined `data:` lines
    #[serde(rename = "data")]
    pub payload: Payload,
}

impl StreamEvent {
    pub fn new(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Check whether this event has the given name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Parsed SSE line types
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event name line: `event: <name>`
    Event(String),
    /// Data line: `data: <value>`
    Data(String),
    /// Empty line (event separator)
    Empty,
    /// Comment or unrecognised field (ignored)
    Comment(String),
}
