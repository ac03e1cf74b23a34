//! Core domain types for mode orchestration and job/stream lifecycles

use serde::{Deserialize, Serialize};

/// Top-level interaction mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Warm-up screen shown once at startup
    #[default]
    Booting,
    /// Mode selection menu
    Start,
    /// Live webcam stream
    Webcam,
    /// Single image upload
    Image,
    /// Video upload
    Video,
}

impl Mode {
    /// Modes that own resources and can be left with `back()`
    pub fn is_active(&self) -> bool {
        matches!(self, Mode::Webcam | Mode::Image | Mode::Video)
    }

    /// Modes that upload a user-selected file
    pub fn is_upload(&self) -> bool {
        matches!(self, Mode::Image | Mode::Video)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Mode::Booting => "Loading Cartoonify",
            Mode::Start => "Cartoonify",
            Mode::Webcam => "Live Webcam Cartoonify",
            Mode::Image => "Image Cartoonify",
            Mode::Video => "Video Cartoonify",
        }
    }
}

/// Lifecycle of a single processing job.
///
/// Moves `Idle → Running → (Succeeded | Failed)` and never re-enters `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Idle => "Idle",
            JobStatus::Running => "Processing",
            JobStatus::Succeeded => "Done",
            JobStatus::Failed => "Failed",
        }
    }
}

/// Transport state of a live stream connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Connecting,
    Open,
    Error,
    Closed,
}

impl StreamState {
    pub fn label(&self) -> &'static str {
        match self {
            StreamState::Connecting => "Connecting",
            StreamState::Open => "Live",
            StreamState::Error => "Unavailable",
            StreamState::Closed => "Closed",
        }
    }
}

/// Which half of a result pair is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayVariant {
    #[default]
    Cartoon,
    Original,
}

impl DisplayVariant {
    pub fn toggled(self) -> Self {
        match self {
            DisplayVariant::Cartoon => DisplayVariant::Original,
            DisplayVariant::Original => DisplayVariant::Cartoon,
        }
    }

    /// Label for the toggle button, which names the *other* variant
    pub fn toggle_label(&self) -> &'static str {
        match self {
            DisplayVariant::Cartoon => "Show Original",
            DisplayVariant::Original => "Show Cartoon",
        }
    }
}
