//! Live frame stream over server-sent events
//!
//! [`spawn_stream_reader`] issues the `GET /webcam-feed` request on a background
//! task, decodes the event stream and forwards [`StreamEvent`]s through an mpsc
//! channel. The returned [`FrameStreamHandle`] is the only way to observe or
//! stop that task.
//!
//! ```text
//!  ┌────────────────────┐  events  ┌─────────────────────────────┐
//!  │ FrameStreamHandle  │◀─────────│ reader task                  │
//!  │                    │          │  request → SseDecoder →      │
//!  │  StreamCloser ─────┼─shutdown▶│  StreamMessage::parse        │
//!  └────────────────────┘          └─────────────────────────────┘
//! ```

use futures_util::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use cartoonify_core::StreamMessage;

use crate::sse::SseDecoder;

/// Events yielded by a frame stream until it closes
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The service accepted the connection
    Opened,
    /// A parsed push message (frame or producer error)
    Message(StreamMessage),
    /// A push message that could not be parsed
    Malformed(String),
    /// Transport failure; no further events follow
    Failed(String),
    /// The service ended the stream; no further events follow
    Ended,
}

impl StreamEvent {
    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Failed(_) | StreamEvent::Ended)
    }
}

/// Capability to stop a stream's reader task.
///
/// Closing is idempotent and also happens on drop, so a closer that goes out
/// of scope never leaves its connection open.
#[derive(Debug)]
pub struct StreamCloser {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl StreamCloser {
    pub fn new(shutdown_tx: watch::Sender<bool>, task: Option<JoinHandle<()>>) -> Self {
        Self { shutdown_tx, task }
    }

    /// Signal the reader to stop and abort it
    pub fn close(&mut self) {
        if !self.shutdown_tx.send_replace(true) {
            debug!("Closing frame stream");
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

impl Drop for StreamCloser {
    fn drop(&mut self) {
        self.close();
    }
}

/// Handle to one open frame stream
#[derive(Debug)]
pub struct FrameStreamHandle {
    events: mpsc::Receiver<StreamEvent>,
    closer: StreamCloser,
}

impl FrameStreamHandle {
    pub fn new(events: mpsc::Receiver<StreamEvent>, closer: StreamCloser) -> Self {
        Self { events, closer }
    }

    /// A handle whose only event is an immediate failure
    pub fn failed(message: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.try_send(StreamEvent::Failed(message.into()));
        let (shutdown_tx, _) = watch::channel(false);
        Self::new(rx, StreamCloser::new(shutdown_tx, None))
    }

    /// Next event, or `None` once the reader has gone away
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    pub fn close(&mut self) {
        self.closer.close();
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_closed()
    }

    /// Split into the event receiver and the closer so they can live in
    /// different owners (a forwarding task and the session state).
    pub fn into_parts(self) -> (mpsc::Receiver<StreamEvent>, StreamCloser) {
        (self.events, self.closer)
    }
}

/// Start reading a server-sent event stream on a background task.
///
/// An event larger than `max_event_bytes` fails the stream.
pub fn spawn_stream_reader(
    request: reqwest::RequestBuilder,
    capacity: usize,
    max_event_bytes: usize,
) -> FrameStreamHandle {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let decoder = SseDecoder::with_limit(max_event_bytes);
    let task = tokio::spawn(run_stream_reader(request, decoder, tx, shutdown_rx));
    FrameStreamHandle::new(rx, StreamCloser::new(shutdown_tx, Some(task)))
}

async fn run_stream_reader(
    request: reqwest::RequestBuilder,
    mut decoder: SseDecoder,
    tx: mpsc::Sender<StreamEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let response = tokio::select! {
        _ = shutdown_rx.changed() => {
            debug!("Frame stream closed before connecting");
            return;
        }
        res = request.send() => res,
    };

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!("Frame stream connection failed: {}", e);
            let _ = tx.send(StreamEvent::Failed(e.to_string())).await;
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!("Frame stream rejected with status {}", status);
        let _ = tx
            .send(StreamEvent::Failed(format!("HTTP {}", status.as_u16())))
            .await;
        return;
    }

    info!("Frame stream connected");
    if tx.send(StreamEvent::Opened).await.is_err() {
        return;
    }

    let mut body = response.bytes_stream();

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                debug!("Frame stream reader stopping on request");
                return;
            }
            chunk = body.next() => match chunk {
                Some(Ok(bytes)) => {
                    let events = match decoder.feed(&bytes) {
                        Ok(events) => events,
                        Err(e) => {
                            warn!("Abandoning frame stream: {}", e);
                            let _ = tx.send(StreamEvent::Failed(e.to_string())).await;
                            return;
                        }
                    };
                    for sse in events {
                        let event = match StreamMessage::parse(&sse.data) {
                            Ok(message) => StreamEvent::Message(message),
                            Err(e) => StreamEvent::Malformed(e.to_string()),
                        };
                        if tx.send(event).await.is_err() {
                            // Receiver dropped: nobody is watching any more
                            return;
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!("Frame stream read error: {}", e);
                    let _ = tx.send(StreamEvent::Failed(e.to_string())).await;
                    return;
                }
                None => {
                    info!("Frame stream ended by service");
                    let _ = tx.send(StreamEvent::Ended).await;
                    return;
                }
            }
        }
    }
}
