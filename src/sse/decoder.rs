//! Incremental SSE decoder
//!
//! Accepts chunks exactly as the transport delivers them and emits events
//! once their terminating blank line has arrived. Whatever follows the last
//! separator stays buffered until the next call.

use crate::sse::events::StreamEvent;
use crate::sse::parser::parse_block;

/// Blank line terminating one event block (after CRLF normalisation).
const SEPARATOR: &str = "\n\n";

/// Stateful decoder for one SSE stream.
///
/// Each stream must own its own decoder; the buffer holds the unterminated
/// tail of that stream only.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Text received after the last complete block
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending_bytes: Vec<u8>,
}

impl SseDecoder {
    /// Create a new decoder with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a text chunk, returning every event it completes.
    pub fn feed(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.push_text(chunk);
        self.drain_complete()
    }

    /// Feed raw body bytes.
    ///
    /// A multi-byte character split across chunks is held back until the
    /// rest of it arrives. Invalid sequences decode to U+FFFD.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let text = self.decode_utf8(chunk);
        self.feed(&text)
    }

    /// Flush the buffer at end of stream.
    ///
    /// The residual content is parsed as if a blank line followed it.
    /// Calling this again with nothing buffered returns no events.
    pub fn finalize(&mut self) -> Vec<StreamEvent> {
        if !self.pending_bytes.is_empty() {
            let tail = std::mem::take(&mut self.pending_bytes);
            self.push_text(&String::from_utf8_lossy(&tail));
        }

        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            return Vec::new();
        }

        self.push_text(SEPARATOR);
        let events = self.drain_complete();
        self.buffer.clear();
        events
    }

    /// Whether any partial event is buffered.
    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty() || !self.pending_bytes.is_empty()
    }

    /// The buffered, not yet terminated text.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Discard all buffered state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending_bytes.clear();
    }

    fn push_text(&mut self, text: &str) {
        self.buffer.push_str(text);
        // A lone trailing '\r' is kept until the next chunk shows whether a '\n' follows
        if self.buffer.contains("\r\n") {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }
    }

    fn drain_complete(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let mut consumed = 0;

        while let Some(offset) = self.buffer[consumed..].find(SEPARATOR) {
            let block = &self.buffer[consumed..consumed + offset];
            if let Some(event) = parse_block(block) {
                events.push(event);
            }
            consumed += offset + SEPARATOR.len();
        }

        if consumed > 0 {
            self.buffer.drain(..consumed);
        }
        events
    }

    fn decode_utf8(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending_bytes);
        bytes.extend_from_slice(chunk);

        let mut text = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    text.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending_bytes = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        text
    }
}
