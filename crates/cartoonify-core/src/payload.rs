//! Image payloads and the result pairs built from them

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::media::MediaKind;
use crate::types::DisplayVariant;

/// A base64-encoded JPEG as delivered by the processing service.
///
/// The encoded text is shared, so clones are cheap and two handles to the same
/// payload compare equal without scanning the text.
/// [`ImagePayload::decode`] yields raw bytes on demand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct ImagePayload(Arc<str>);

impl ImagePayload {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(Arc::from(encoded.into()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(BASE64_ENGINE.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both handles share the same encoded text
    pub fn ptr_eq(&self, other: &ImagePayload) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64_ENGINE
            .decode(self.0.as_bytes())
            .map_err(|e| Error::decode(format!("invalid base64 payload: {e}")))
    }
}

impl From<String> for ImagePayload {
    fn from(encoded: String) -> Self {
        Self::new(encoded)
    }
}

/// One original/cartoon pair pushed by the live stream
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub original: ImagePayload,
    pub cartoon: ImagePayload,
    pub captured_at: DateTime<Local>,
}

impl Frame {
    pub fn new(original: ImagePayload, cartoon: ImagePayload) -> Self {
        Self {
            original,
            cartoon,
            captured_at: Local::now(),
        }
    }

    pub fn payload(&self, variant: DisplayVariant) -> &ImagePayload {
        match variant {
            DisplayVariant::Cartoon => &self.cartoon,
            DisplayVariant::Original => &self.original,
        }
    }
}

/// Original and cartoonified image returned for an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair {
    pub original: ImagePayload,
    pub cartoon: ImagePayload,
}

impl ImagePair {
    pub fn payload(&self, variant: DisplayVariant) -> &ImagePayload {
        match variant {
            DisplayVariant::Cartoon => &self.cartoon,
            DisplayVariant::Original => &self.original,
        }
    }
}

/// Result of one upload job.
///
/// Image replies always carry both images. The video endpoint may answer with
/// only a status `message` (`{"message": ..., "progress": 100}`), in which case
/// `images` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub images: Option<ImagePair>,
    /// Informational text the service attaches to video results
    pub message: Option<String>,
}

/// Success body as sent by either upload endpoint
#[derive(Debug, Deserialize)]
struct ResultBody {
    original: Option<ImagePayload>,
    cartoon: Option<ImagePayload>,
    #[serde(default)]
    message: Option<String>,
}

impl ProcessingResult {
    pub fn new(original: ImagePayload, cartoon: ImagePayload) -> Self {
        Self {
            images: Some(ImagePair { original, cartoon }),
            message: None,
        }
    }

    /// A video result that carries only the service's status text
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            images: None,
            message: Some(message.into()),
        }
    }

    /// Parse a success body from the endpoint for `kind`.
    ///
    /// Image replies must carry both images. Video replies carry both or
    /// neither; a lone image is malformed either way.
    pub fn parse(kind: MediaKind, body: &str) -> Result<Self> {
        let body: ResultBody =
            serde_json::from_str(body).map_err(|e| Error::decode(e.to_string()))?;

        let images = match (body.original, body.cartoon) {
            (Some(original), Some(cartoon)) => Some(ImagePair { original, cartoon }),
            (None, None) if kind == MediaKind::Video => None,
            (None, _) => return Err(Error::decode("missing field `original`")),
            (Some(_), None) => return Err(Error::decode("missing field `cartoon`")),
        };

        Ok(Self {
            images,
            message: body.message,
        })
    }

    pub fn payload(&self, variant: DisplayVariant) -> Option<&ImagePayload> {
        self.images.as_ref().map(|pair| pair.payload(variant))
    }
}
