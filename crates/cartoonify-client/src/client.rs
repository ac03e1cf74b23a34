//! Request layer for the processing service
//!
//! [`ProcessingClient`] is the seam between the application and the remote
//! cartoonification service. [`HttpProcessingClient`] implements it with
//! reqwest; tests substitute the scripted client from `test_utils`.
//!
//! No operation retries: a single failure is returned to the caller as-is.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};
use url::Url;

use cartoonify_core::prelude::*;
use cartoonify_core::{MediaKind, ProcessingResult, ServiceErrorBody, Upload};

use crate::sse::MAX_EVENT_BYTES;
use crate::stream::{spawn_stream_reader, FrameStreamHandle};

/// Path of the server-push endpoint
pub const WEBCAM_FEED_PATH: &str = "/webcam-feed";

/// Default base URL of a locally running service
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Number of undelivered stream events buffered before the reader waits
pub const DEFAULT_STREAM_BUFFER: usize = 8;

/// Operations offered by the processing service
#[trait_variant::make(ProcessingClient: Send)]
pub trait LocalProcessingClient {
    /// Upload a still image and wait for the cartoonified pair
    async fn submit_image(&self, upload: Upload) -> Result<ProcessingResult>;

    /// Upload a video and wait for the result.
    ///
    /// Same contract as [`submit_image`](Self::submit_image); latency is
    /// seconds to minutes and there are no partial results. A success reply
    /// may carry only a status message and no images.
    async fn submit_video(&self, upload: Upload) -> Result<ProcessingResult>;

    /// Open the live frame stream. Connection happens in the background;
    /// failures arrive as events on the returned handle.
    fn open_frame_stream(&self) -> FrameStreamHandle;
}

/// Dispatch an upload to the endpoint matching its kind
pub async fn submit<C>(client: &C, kind: MediaKind, upload: Upload) -> Result<ProcessingResult>
where
    C: ProcessingClient + Sync,
{
    match kind {
        MediaKind::Image => client.submit_image(upload).await,
        MediaKind::Video => client.submit_video(upload).await,
    }
}

/// Connection settings for [`HttpProcessingClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Total time allowed for one upload request; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub stream_buffer: usize,
    /// Largest single push message accepted on the frame stream
    pub max_event_bytes: usize,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: None,
            connect_timeout: Duration::from_secs(10),
            stream_buffer: DEFAULT_STREAM_BUFFER,
            max_event_bytes: MAX_EVENT_BYTES,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_event_bytes(mut self, max: usize) -> Self {
        self.max_event_bytes = max;
        self
    }
}

/// reqwest-backed client
#[derive(Debug, Clone)]
pub struct HttpProcessingClient {
    /// Client for uploads (carries the request timeout)
    http: reqwest::Client,
    /// Client for the long-lived stream (no total timeout)
    stream_http: reqwest::Client,
    base_url: Url,
    stream_buffer: usize,
    max_event_bytes: usize,
}

impl HttpProcessingClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let stream_http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        info!("Processing client targeting {}", config.base_url);

        Ok(Self {
            http,
            stream_http,
            base_url: config.base_url,
            stream_buffer: config.stream_buffer,
            max_event_bytes: config.max_event_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::config(format!("Invalid endpoint {path}: {e}")))
    }

    async fn post_upload(&self, kind: MediaKind, upload: Upload) -> Result<ProcessingResult> {
        let url = self.endpoint(kind.endpoint())?;
        let size = upload.bytes.len();

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.media_type)
            .map_err(|_| Error::unsupported_type(&upload.media_type, kind.expected()))?;
        let form = Form::new().part(kind.form_field(), part);

        debug!(
            "POST {} ({} '{}', {} bytes)",
            url,
            kind.label(),
            upload.file_name,
            size
        );

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            let message = ServiceErrorBody::extract(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            warn!("{} upload rejected: {} {}", kind.label(), status, message);
            return Err(Error::service(status.as_u16(), message));
        }

        let result = ProcessingResult::parse(kind, &body)?;
        if result.images.is_none() {
            info!(
                "{} upload processed without images ({} bytes in): {}",
                kind.label(),
                size,
                result.message.as_deref().unwrap_or("no message")
            );
        } else {
            info!("{} upload processed ({} bytes in)", kind.label(), size);
        }
        Ok(result)
    }
}

impl ProcessingClient for HttpProcessingClient {
    async fn submit_image(&self, upload: Upload) -> Result<ProcessingResult> {
        self.post_upload(MediaKind::Image, upload).await
    }

    async fn submit_video(&self, upload: Upload) -> Result<ProcessingResult> {
        self.post_upload(MediaKind::Video, upload).await
    }

    fn open_frame_stream(&self) -> FrameStreamHandle {
        match self.endpoint(WEBCAM_FEED_PATH) {
            Ok(url) => {
                debug!("GET {}", url);
                let request = self
                    .stream_http
                    .get(url)
                    .header(ACCEPT, "text/event-stream");
                spawn_stream_reader(request, self.stream_buffer, self.max_event_bytes)
            }
            Err(e) => FrameStreamHandle::failed(e.to_string()),
        }
    }
}

fn network_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::network(format!("request timed out: {e}"))
    } else {
        Error::network(e.to_string())
    }
}
