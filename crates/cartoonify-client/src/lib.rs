//! # cartoonify-client - Processing Service Client
//!
//! Talks to the remote cartoonification service: multipart uploads for still
//! images and videos, and the server-sent event stream that carries live
//! webcam frames.
//!
//! Depends on [`cartoonify_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Requests (`client`)
//! - [`ProcessingClient`] - Async trait implemented by every client
//! - [`HttpProcessingClient`] - reqwest implementation
//! - [`ClientConfig`] - Base URL and timeouts
//! - [`submit()`] - Route an upload to the matching endpoint
//!
//! ### Live Stream (`stream`, `sse`)
//! - [`FrameStreamHandle`] - Receiver side of an open stream
//! - [`StreamCloser`] - Idempotent close capability
//! - [`StreamEvent`] - Opened / Message / Malformed / Failed / Ended
//! - [`SseDecoder`] - Incremental `text/event-stream` decoder

pub mod client;
pub mod sse;
pub mod stream;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{
    submit, ClientConfig, HttpProcessingClient, LocalProcessingClient, ProcessingClient,
    DEFAULT_BASE_URL, DEFAULT_STREAM_BUFFER, WEBCAM_FEED_PATH,
};
pub use sse::{SseDecoder, SseEvent, MAX_EVENT_BYTES};
pub use stream::{spawn_stream_reader, FrameStreamHandle, StreamCloser, StreamEvent};
