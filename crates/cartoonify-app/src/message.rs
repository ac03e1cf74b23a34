//! Message types for the application (TEA pattern)

use cartoonify_client::StreamEvent;
use cartoonify_core::{Mode, ProcessingResult};

use crate::input_key::InputKey;
use crate::job::JobId;
use crate::mode::ActivationId;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Quit immediately (Ctrl+C, `q` on the start menu, signal handler)
    Quit,

    /// Warm-up delay elapsed (or was skipped)
    BootComplete,

    // ─────────────────────────────────────────────────────────
    // Mode Messages
    // ─────────────────────────────────────────────────────────
    /// Move the start-menu highlight up
    MenuUp,

    /// Move the start-menu highlight down
    MenuDown,

    /// Enter the highlighted start-menu entry
    MenuConfirm,

    /// Enter a mode from the start menu
    SelectMode(Mode),

    /// Leave the active mode for the start menu
    Back,

    /// Switch between original and cartoon
    ToggleDisplay,

    // ─────────────────────────────────────────────────────────
    // Upload Messages
    // ─────────────────────────────────────────────────────────
    /// Replace the path prompt contents
    PathInput { text: String },

    /// Text pasted into the terminal (bracketed paste)
    Paste { text: String },

    /// Submit the path prompt contents as the selected file
    SubmitPath,

    /// An upload finished (successfully or not)
    JobFinished {
        activation: ActivationId,
        job_id: JobId,
        result: Result<ProcessingResult, String>,
    },

    /// Synthetic progress estimator tick
    ProgressTick {
        activation: ActivationId,
        job_id: JobId,
    },

    // ─────────────────────────────────────────────────────────
    // Stream Messages
    // ─────────────────────────────────────────────────────────
    /// Event from the live frame stream of a webcam activation
    Stream {
        activation: ActivationId,
        event: StreamEvent,
    },
}
