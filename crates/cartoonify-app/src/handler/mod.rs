//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for each mode

pub(crate) mod keys;
pub(crate) mod update;


use std::time::Duration;

use tokio::sync::watch;

use cartoonify_core::{MediaKind, SelectedFile};

use crate::job::JobId;
use crate::message::Message;
use crate::mode::ActivationId;

// Re-export main entry point
pub use keys::handle_key;
pub use update::update;

/// Cadence of a synthetic progress estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorPlan {
    pub interval: Duration,
}

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Open the live frame stream for a webcam activation
    OpenFrameStream {
        activation: ActivationId,
        /// Fires when the activation ends
        cancel: watch::Receiver<bool>,
    },

    /// Read a file and upload it to the processing service.
    ///
    /// The result comes back as `Message::JobFinished` unless the activation
    /// was cancelled in the meantime.
    SubmitUpload {
        activation: ActivationId,
        job_id: JobId,
        kind: MediaKind,
        file: SelectedFile,
        cancel: watch::Receiver<bool>,
        /// Present for jobs that show a synthetic progress estimate
        estimator: Option<EstimatorPlan>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
