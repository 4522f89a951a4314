//! SSE line and block parsing
//!
//! A block is the text between two blank-line separators. Parsing a block
//! never fails: unknown lines are skipped and payloads that are not JSON
//! degrade to text.

use crate::sse::events::{Payload, SseLine, StreamEvent, DEFAULT_EVENT_NAME};

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    // Unknown field (id:, retry:, ...) - treat as comment
    SseLine::Comment(line.to_string())
}

/// Parse one complete event block.
///
/// The name is taken from the last `event:` line as written, even when
/// empty; `message` applies only when there is no `event:` line. Returns
/// `None` when the block has no `data:` line.
pub fn parse_block(block: &str) -> Option<StreamEvent> {
    let mut name: Option<String> = None;
    let mut data_lines: Vec<String> = Vec::new();

    for line in block.split('\n') {
        match parse_sse_line(line) {
            SseLine::Event(event_name) => {
                name = Some(event_name);
            }
            SseLine::Data(data) => data_lines.push(data),
            SseLine::Empty | SseLine::Comment(_) => {}
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    let payload = Payload::from_data(data_lines.join("\n"));
    Some(StreamEvent::new(
        name.unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Tests for parse_sse_line

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_sse_line(""), SseLine::Empty);
    }

    #[test]
    fn test_parse_comment_line() {
        assert_eq!(
            parse_sse_line(": keep-alive"),
            SseLine::Comment("keep-alive".to_string())
        );
        assert_eq!(parse_sse_line(":"), SseLine::Comment(String::new()));
    }

    #[test]
    fn test_parse_event_line() {
        assert_eq!(
            parse_sse_line("event: answer"),
            SseLine::Event("answer".to_string())
        );
        assert_eq!(
            parse_sse_line("event:answer"),
            SseLine::Event("answer".to_string())
        );
        assert_eq!(
            parse_sse_line("event:   progress  "),
            SseLine::Event("progress".to_string())
        );
    }

    #[test]
    fn test_parse_data_line() {
        assert_eq!(
            parse_sse_line(r#"data: {"text": "hello"}"#),
            SseLine::Data(r#"{"text": "hello"}"#.to_string())
        );
        assert_eq!(parse_sse_line("data:1"), SseLine::Data("1".to_string()));
    }

    #[test]
    fn test_parse_unknown_line() {
        assert_eq!(
            parse_sse_line("id: 7"),
            SseLine::Comment("id: 7".to_string())
        );
        // A field name is only recognised at the start of the line
        assert_eq!(
            parse_sse_line(" data: x"),
            SseLine::Comment(" data: x".to_string())
        );
    }

    // Tests for parse_block

    #[test]
    fn test_block_defaults_to_message() {
        let event = parse_block(r#"data: {"id": 1}"#).unwrap();
        assert_eq!(event.name, "message");
        assert_eq!(event.payload, Payload::Json(json!({"id": 1})));
    }

    #[test]
    fn test_block_with_event_name() {
        let event = parse_block("event: token\ndata: hel").unwrap();
        assert_eq!(event.name, "token");
        assert_eq!(event.payload, Payload::Text("hel".to_string()));
    }

    #[test]
    fn test_block_last_event_line_wins() {
        let event = parse_block("event: a\nevent: b\ndata: 1").unwrap();
        assert_eq!(event.name, "b");
    }

    #[test]
    fn test_block_empty_event_name_is_kept() {
        let event = parse_block("event:\ndata: 1").unwrap();
        assert_eq!(event.name, "");

        let event = parse_block("event: a\nevent:   \ndata: 1").unwrap();
        assert_eq!(event.name, "");
    }

    #[test]
    fn test_block_without_data_emits_nothing() {
        assert!(parse_block("event: done").is_none());
        assert!(parse_block(": comment only").is_none());
        assert!(parse_block("").is_none());
    }

    #[test]
    fn test_block_multiple_data_lines_join_with_newline() {
        // The newline between lines is JSON whitespace
        let event = parse_block("data:{\"a\":1,\ndata:\"b\":2}").unwrap();
        assert_eq!(event.payload, Payload::Json(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_block_invalid_joined_json_degrades_to_text() {
        let event = parse_block("data:{\"a\":1,\ndata:b}").unwrap();
        assert_eq!(event.payload, Payload::Text("{\"a\":1,\nb}".to_string()));
    }

    #[test]
    fn test_block_multiple_data_lines_forming_json() {
        let event = parse_block("data: [1,\ndata: 2]").unwrap();
        assert_eq!(event.payload, Payload::Json(json!([1, 2])));
    }

    #[test]
    fn test_block_ignores_comments_and_unknown_fields() {
        let event = parse_block(": ping\nid: 3\nevent: done\nretry: 10\ndata: {}").unwrap();
        assert_eq!(event.name, "done");
        assert_eq!(event.payload, Payload::Json(json!({})));
    }
}
