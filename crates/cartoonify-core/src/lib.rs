//! # cartoonify-core - Core Domain Types
//!
//! Foundation crate for Cartoonify. Provides domain types, error handling,
//! push-message parsing, media classification and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, base64, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Mode`] - The exclusive interaction mode (Booting, Start, Webcam, Image, Video)
//! - [`JobStatus`] - Upload job lifecycle (Idle, Running, Succeeded, Failed)
//! - [`StreamState`] - Live stream transport state
//! - [`DisplayVariant`] - Original/cartoon toggle
//!
//! ### Payloads (`payload`)
//! - [`ImagePayload`], [`Frame`], [`ImagePair`], [`ProcessingResult`]
//!
//! ### Media (`media`)
//! - [`MediaKind`], [`SelectedFile`], [`Upload`]
//!
//! ### Progress (`progress`)
//! - [`ProgressEstimate`] - Capped synthetic estimate
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum grouped by layer
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! ```rust
//! use cartoonify_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod media;
pub mod payload;
pub mod progress;
pub mod types;

/// Prelude for common imports used throughout all Cartoonify crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result};
pub use events::{ServiceErrorBody, StreamMessage};
pub use media::{media_type_from_path, MediaKind, SelectedFile, Upload, UNKNOWN_MEDIA_TYPE};
pub use payload::{Frame, ImagePair, ImagePayload, ProcessingResult};
pub use progress::{ProgressEstimate, COMPLETE, ESTIMATE_CAP};
pub use types::{DisplayVariant, JobStatus, Mode, StreamState};
