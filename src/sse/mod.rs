//! SSE (Server-Sent Events) stream decoder
//!
//! Decodes the event stream returned by the streaming API endpoints.
//! SSE format consists of:
//! - `event: <name>` - event name line (defaults to `message`)
//! - `data: <payload>` - payload line, may repeat within one event
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `events` - Event type definitions (StreamEvent, Payload, SseLine)
//! - `parser` - Line and block parsing (parse_sse_line, parse_block)
//! - `decoder` - Incremental chunk decoder (SseDecoder)

mod decoder;
mod events;
mod parser;

// Re-export public types
pub use decoder::SseDecoder;
pub use events::{Payload, SseLine, StreamEvent, DEFAULT_EVENT_NAME};
pub use parser::{parse_block, parse_sse_line};
