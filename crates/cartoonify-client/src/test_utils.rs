//! Scripted processing client for tests
//!
//! [`FakeProcessingClient`] records every upload and either answers it
//! immediately (see [`FakeProcessingClient::replying_with`]) or parks it until
//! the test calls [`FakeProcessingClient::complete_next`]. Frame streams it
//! opens are driven through [`StreamFeeder`]s.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, oneshot, watch};

use cartoonify_core::prelude::*;
use cartoonify_core::{ImagePayload, MediaKind, ProcessingResult, Upload};

use crate::client::ProcessingClient;
use crate::stream::{FrameStreamHandle, StreamCloser, StreamEvent};

/// Canned answer for an upload
#[derive(Debug, Clone, PartialEq)]
pub enum FakeReply {
    Success(ProcessingResult),
    Service { status: u16, message: String },
    Network(String),
    Decode(String),
}

impl FakeReply {
    /// Success with the given original/cartoon payload text
    pub fn pair(original: &str, cartoon: &str) -> Self {
        FakeReply::Success(ProcessingResult::new(
            ImagePayload::new(original),
            ImagePayload::new(cartoon),
        ))
    }

    fn into_result(self) -> Result<ProcessingResult> {
        match self {
            FakeReply::Success(result) => Ok(result),
            FakeReply::Service { status, message } => Err(Error::service(status, message)),
            FakeReply::Network(message) => Err(Error::network(message)),
            FakeReply::Decode(message) => Err(Error::decode(message)),
        }
    }
}

/// One recorded upload
#[derive(Debug, Clone, PartialEq)]
pub struct FakeCall {
    pub kind: MediaKind,
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Test side of a frame stream opened by the fake
#[derive(Debug, Clone)]
pub struct StreamFeeder {
    events_tx: mpsc::Sender<StreamEvent>,
    shutdown_rx: watch::Receiver<bool>,
}

impl StreamFeeder {
    /// Deliver an event, waiting for buffer space
    pub async fn push(&self, event: StreamEvent) -> bool {
        self.events_tx.send(event).await.is_ok()
    }

    /// Whether the consumer closed its end of the stream
    pub fn is_closed(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}

#[derive(Debug, Default)]
struct FakeState {
    auto_reply: Option<FakeReply>,
    calls: Vec<FakeCall>,
    pending: VecDeque<oneshot::Sender<Result<ProcessingResult>>>,
    streams: Vec<StreamFeeder>,
}

/// In-memory [`ProcessingClient`]
#[derive(Debug, Clone, Default)]
pub struct FakeProcessingClient {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProcessingClient {
    /// A client whose uploads wait for [`complete_next`](Self::complete_next)
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that answers every upload with `reply`
    pub fn replying_with(reply: FakeReply) -> Self {
        let client = Self::default();
        client.lock().auto_reply = Some(reply);
        client
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        // A poisoned lock only happens after a test already panicked
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Answer the oldest parked upload. Returns false when none is waiting
    /// or its caller has gone away.
    pub fn complete_next(&self, reply: FakeReply) -> bool {
        let sender = self.lock().pending.pop_front();
        match sender {
            Some(tx) => tx.send(reply.into_result()).is_ok(),
            None => false,
        }
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Feeders for every stream opened so far, oldest first
    pub fn streams(&self) -> Vec<StreamFeeder> {
        self.lock().streams.clone()
    }

    /// Streams whose consumer has not closed them
    pub fn open_stream_count(&self) -> usize {
        self.lock().streams.iter().filter(|s| !s.is_closed()).count()
    }

    async fn record(&self, kind: MediaKind, upload: Upload) -> Result<ProcessingResult> {
        let waiter = {
            let mut state = self.lock();
            state.calls.push(FakeCall {
                kind,
                file_name: upload.file_name,
                media_type: upload.media_type,
                bytes: upload.bytes,
            });
            match state.auto_reply.clone() {
                Some(reply) => return reply.into_result(),
                None => {
                    let (tx, rx) = oneshot::channel();
                    state.pending.push_back(tx);
                    rx
                }
            }
        };
        waiter.await.map_err(|_| Error::ChannelClosed)?
    }
}

impl ProcessingClient for FakeProcessingClient {
    async fn submit_image(&self, upload: Upload) -> Result<ProcessingResult> {
        self.record(MediaKind::Image, upload).await
    }

    async fn submit_video(&self, upload: Upload) -> Result<ProcessingResult> {
        self.record(MediaKind::Video, upload).await
    }

    fn open_frame_stream(&self) -> FrameStreamHandle {
        let (events_tx, events_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.lock().streams.push(StreamFeeder {
            events_tx,
            shutdown_rx,
        });
        FrameStreamHandle::new(events_rx, StreamCloser::new(shutdown_tx, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::submit;

    fn upload(name: &str) -> Upload {
        Upload {
            file_name: name.to_string(),
            media_type: "image/png".to_string(),
            bytes: vec![7],
        }
    }

    #[tokio::test]
    async fn test_auto_reply() {
        let fake = FakeProcessingClient::replying_with(FakeReply::pair("X", "Y"));
        let result = fake.submit_image(upload("a.png")).await.unwrap();
        assert_eq!(result.images.unwrap().cartoon.as_str(), "Y");
        assert_eq!(fake.call_count(), 1);
        assert_eq!(fake.calls()[0].kind, MediaKind::Image);
    }

    #[tokio::test]
    async fn test_parked_call_completes_on_demand() {
        let fake = FakeProcessingClient::new();
        let task = {
            let fake = fake.clone();
            tokio::spawn(async move { submit(&fake, MediaKind::Video, upload("v.mp4")).await })
        };
        while fake.pending_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(fake.complete_next(FakeReply::Service {
            status: 500,
            message: "boom".into()
        }));
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Service { status: 500, .. }));
        assert_eq!(fake.calls()[0].kind, MediaKind::Video);
    }

    #[test]
    fn test_complete_without_pending_is_false() {
        let fake = FakeProcessingClient::new();
        assert!(!fake.complete_next(FakeReply::pair("a", "b")));
    }

    #[tokio::test]
    async fn test_stream_feeder_sees_close() {
        let fake = FakeProcessingClient::new();
        let mut handle = fake.open_frame_stream();
        assert_eq!(fake.open_stream_count(), 1);

        let feeder = fake.streams().remove(0);
        assert!(feeder.push(StreamEvent::Opened).await);
        assert_eq!(handle.next_event().await, Some(StreamEvent::Opened));

        handle.close();
        assert!(feeder.is_closed());
        assert_eq!(fake.open_stream_count(), 0);
    }
}
