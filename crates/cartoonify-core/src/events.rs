//! Messages pushed by the processing service over the webcam feed

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::payload::{Frame, ImagePayload};

/// A single decoded push message
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    /// A fresh original/cartoon pair
    Frame(Frame),
    /// The producer could not supply a frame (e.g. camera not available)
    ProducerError(String),
}

/// Raw JSON shape of a push message: either a frame pair or an `error` field
#[derive(Debug, Deserialize)]
struct RawStreamMessage {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    original: Option<String>,
    #[serde(default)]
    cartoon: Option<String>,
}

impl StreamMessage {
    /// Parse the `data` of one server-sent event.
    ///
    /// An `error` field wins over any frame fields that happen to be present.
    pub fn parse(data: &str) -> Result<Self> {
        let raw: RawStreamMessage =
            serde_json::from_str(data).map_err(|e| Error::decode(e.to_string()))?;

        if let Some(error) = raw.error {
            return Ok(StreamMessage::ProducerError(error));
        }

        match (raw.original, raw.cartoon) {
            (Some(original), Some(cartoon)) => Ok(StreamMessage::Frame(Frame::new(
                ImagePayload::new(original),
                ImagePayload::new(cartoon),
            ))),
            _ => Err(Error::decode(
                "stream message has neither a frame pair nor an error",
            )),
        }
    }
}

/// Error body returned by the service alongside a failure status
#[derive(Debug, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

impl ServiceErrorBody {
    /// Best-effort extraction of the `error` text from a failure body
    pub fn extract(body: &str) -> Option<String> {
        serde_json::from_str::<ServiceErrorBody>(body)
            .ok()
            .map(|b| b.error)
    }
}
