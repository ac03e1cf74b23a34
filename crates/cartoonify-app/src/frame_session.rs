//! Live webcam session state
//!
//! A [`FrameStreamSession`] consumes [`StreamEvent`]s for one webcam-mode
//! activation and keeps only the most recent [`Frame`]. A producer error or
//! an unparseable push leaves the last frame untouched; only transport failure
//! or end-of-stream changes the connection state.

use cartoonify_client::{StreamCloser, StreamEvent};
use cartoonify_core::prelude::*;
use cartoonify_core::{Frame, StreamMessage, StreamState};

/// What the webcam screen should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamView {
    /// Waiting for the first frame
    Connecting,
    /// No frame ever arrived and the stream or its producer reported an error
    Unavailable,
    /// A frame is available
    Live,
}

#[derive(Debug, Default)]
pub struct FrameStreamSession {
    state: StreamState,
    latest: Option<Frame>,
    frames_received: u64,
    producer_error: Option<String>,
    transport_error: Option<String>,
    closer: Option<StreamCloser>,
}

impl FrameStreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of the transport's close capability. A session that is
    /// already closed closes the new handle straight away.
    pub fn attach(&mut self, mut closer: StreamCloser) {
        if self.state == StreamState::Closed {
            closer.close();
            return;
        }
        if let Some(mut old) = self.closer.replace(closer) {
            old.close();
        }
    }

    /// Apply one stream event. Returns `true` if the displayed frame changed.
    pub fn apply(&mut self, event: StreamEvent) -> bool {
        if self.state == StreamState::Closed {
            trace!("Ignoring stream event after close: {:?}", event);
            return false;
        }

        match event {
            StreamEvent::Opened => {
                if self.state == StreamState::Connecting {
                    self.state = StreamState::Open;
                }
                false
            }
            StreamEvent::Message(StreamMessage::Frame(frame)) => {
                self.state = StreamState::Open;
                self.latest = Some(frame);
                self.frames_received += 1;
                self.producer_error = None;
                true
            }
            StreamEvent::Message(StreamMessage::ProducerError(message)) => {
                warn!("Webcam producer error: {}", message);
                self.producer_error = Some(message);
                false
            }
            StreamEvent::Malformed(reason) => {
                warn!("Dropping malformed stream message: {}", reason);
                false
            }
            StreamEvent::Failed(reason) => {
                let error = Error::stream(reason);
                warn!("Webcam stream failed: {}", error);
                self.transport_error = Some(error.to_string());
                self.state = StreamState::Error;
                self.release();
                false
            }
            StreamEvent::Ended => {
                info!("Webcam stream ended by service");
                self.state = StreamState::Closed;
                self.release();
                false
            }
        }
    }

    /// Release the transport. Idempotent.
    pub fn close(&mut self) {
        if self.closer.is_some() {
            debug!("Closing webcam session");
        }
        self.release();
        self.state = StreamState::Closed;
    }

    fn release(&mut self) {
        if let Some(mut closer) = self.closer.take() {
            closer.close();
        }
    }

    pub fn view(&self) -> StreamView {
        if self.latest.is_some() {
            StreamView::Live
        } else if self.state == StreamState::Error
            || self.state == StreamState::Closed
            || self.producer_error.is_some()
        {
            StreamView::Unavailable
        } else {
            StreamView::Connecting
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn latest(&self) -> Option<&Frame> {
        self.latest.as_ref()
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    /// Most relevant error text for the status line
    pub fn error(&self) -> Option<&str> {
        self.transport_error
            .as_deref()
            .or(self.producer_error.as_deref())
    }

    /// Whether a transport handle is still held
    pub fn has_open_handle(&self) -> bool {
        self.closer.as_ref().is_some_and(|c| !c.is_closed())
    }
}
