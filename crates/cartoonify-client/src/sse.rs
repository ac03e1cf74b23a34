//! Incremental decoder for `text/event-stream` bodies
//!
//! The webcam feed arrives as arbitrary byte chunks. [`SseDecoder`] buffers
//! partial lines across chunks and yields one [`SseEvent`] per blank-line
//! terminated block. Only the `event` and `data` fields are interpreted;
//! comments, `id` and `retry` lines are ignored.

use cartoonify_core::{Error, Result};

/// Default upper bound on one event: its pending line plus collected data
pub const MAX_EVENT_BYTES: usize = 32 * 1024 * 1024;

/// One dispatched server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name (`message` when the block carries no `event:` line)
    pub event: String,
    /// Concatenated `data:` lines, joined with `\n`
    pub data: String,
}

/// Stateful line decoder fed with raw body chunks
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known to hold no line terminator
    scanned: usize,
    event: Option<String>,
    data: Vec<String>,
    data_len: usize,
    max_event_bytes: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_EVENT_BYTES)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder that rejects events larger than `max_event_bytes`
    pub fn with_limit(max_event_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            event: None,
            data: Vec::new(),
            data_len: 0,
            max_event_bytes: max_event_bytes.max(1),
        }
    }

    /// Feed a chunk and collect any events completed by it.
    ///
    /// Fails once the event being assembled grows past the limit. The
    /// decoder is reset and the stream should be abandoned, since the
    /// remaining bytes can no longer be framed reliably.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<SseEvent>> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(offset) = self.buffer[self.scanned..].iter().position(|b| *b == b'\n') {
            let pos = self.scanned + offset;
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.scanned = 0;
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
            self.check_limit()?;
        }
        self.scanned = self.buffer.len();
        self.check_limit()?;
        Ok(events)
    }

    /// Bytes held back waiting for a line terminator
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    fn check_limit(&mut self) -> Result<()> {
        if self.data_len + self.buffer.len() <= self.max_event_bytes {
            return Ok(());
        }
        let limit = self.max_event_bytes;
        *self = Self::with_limit(limit);
        Err(Error::decode(format!("server-sent event exceeds {limit} bytes")))
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => {
                self.data_len += value.len() + 1;
                self.data.push(value.to_string());
            }
            "event" => self.event = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        self.data_len = 0;
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}
