//! Mode state machine
//!
//! ```text
//!  Booting ──warm-up──▶ Start ──select──▶ Webcam | Image | Video
//!                         ▲                         │
//!                         └──────── back / Esc ─────┘
//! ```
//!
//! Every entry into an active mode creates an [`Activation`] with its own id,
//! cancellation signal and freshly constructed resources. Leaving the mode
//! fires the signal and tears those resources down before returning.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use cartoonify_core::prelude::*;
use cartoonify_core::{DisplayVariant, MediaKind, Mode};

use crate::frame_session::FrameStreamSession;
use crate::upload::UploadScreen;

/// Identifier of one mode activation
pub type ActivationId = u64;

static ACTIVATION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_activation_id() -> ActivationId {
    ACTIVATION_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Resources owned by an active mode
#[derive(Debug)]
pub enum ModeResources {
    Webcam(FrameStreamSession),
    Upload(UploadScreen),
}

impl ModeResources {
    fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Webcam => Some(ModeResources::Webcam(FrameStreamSession::new())),
            Mode::Image | Mode::Video => {
                MediaKind::for_mode(mode).map(|kind| ModeResources::Upload(UploadScreen::new(kind)))
            }
            Mode::Booting | Mode::Start => None,
        }
    }

    fn teardown(&mut self) {
        match self {
            ModeResources::Webcam(session) => session.close(),
            ModeResources::Upload(screen) => screen.teardown(),
        }
    }
}

/// One entry into an active mode
#[derive(Debug)]
pub struct Activation {
    id: ActivationId,
    mode: Mode,
    cancel_tx: watch::Sender<bool>,
    /// Which half of a result pair is on screen
    pub display: DisplayVariant,
    pub resources: ModeResources,
}

impl Activation {
    pub fn id(&self) -> ActivationId {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Signal that flips to `true` when this activation ends
    pub fn cancel_signal(&self) -> watch::Receiver<bool> {
        self.cancel_tx.subscribe()
    }

    fn end(&mut self) {
        self.cancel_tx.send_replace(true);
        self.resources.teardown();
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        self.end();
    }
}

/// Owns the current [`Mode`] and the resources of the active one
#[derive(Debug, Default)]
pub struct ModeController {
    mode: Mode,
    activation: Option<Activation>,
    default_display: DisplayVariant,
}

impl ModeController {
    pub fn new(default_display: DisplayVariant) -> Self {
        Self {
            mode: Mode::Booting,
            activation: None,
            default_display,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Leave the warm-up screen. Returns false outside `Booting`.
    pub fn finish_boot(&mut self) -> bool {
        if self.mode != Mode::Booting {
            return false;
        }
        self.mode = Mode::Start;
        info!("Warm-up complete, showing start menu");
        true
    }

    /// Enter `mode` from the start menu
    pub fn select(&mut self, mode: Mode) -> Result<ActivationId> {
        if self.mode != Mode::Start {
            return Err(Error::invalid_transition(format!(
                "cannot select {:?} from {:?}",
                mode, self.mode
            )));
        }
        let Some(resources) = ModeResources::for_mode(mode) else {
            return Err(Error::invalid_transition(format!(
                "{:?} is not a selectable mode",
                mode
            )));
        };

        let (cancel_tx, _) = watch::channel(false);
        let activation = Activation {
            id: next_activation_id(),
            mode,
            cancel_tx,
            display: self.default_display,
            resources,
        };
        let id = activation.id;
        info!("Entering {:?} (activation {})", mode, id);

        self.activation = Some(activation);
        self.mode = mode;
        Ok(id)
    }

    /// Return to the start menu, tearing down the active mode.
    ///
    /// No-op outside an active mode. Returns the id of the ended activation.
    pub fn back(&mut self) -> Option<ActivationId> {
        if !self.mode.is_active() {
            return None;
        }
        let ended = self.activation.take().map(|mut activation| {
            activation.end();
            activation.id
        });
        info!("Leaving {:?} for start menu", self.mode);
        self.mode = Mode::Start;
        ended
    }

    pub fn activation(&self) -> Option<&Activation> {
        self.activation.as_ref()
    }

    pub fn activation_id(&self) -> Option<ActivationId> {
        self.activation.as_ref().map(|a| a.id)
    }

    /// Whether `id` is the activation currently on screen
    pub fn is_current(&self, id: ActivationId) -> bool {
        self.activation_id() == Some(id)
    }

    /// Active activation, only if it is `id`
    pub fn current_mut(&mut self, id: ActivationId) -> Option<&mut Activation> {
        self.activation.as_mut().filter(|a| a.id == id)
    }

    pub fn display(&self) -> DisplayVariant {
        self.activation
            .as_ref()
            .map(|a| a.display)
            .unwrap_or(self.default_display)
    }

    /// Flip the displayed variant. Returns false when no mode is active.
    pub fn toggle_display(&mut self) -> bool {
        match self.activation.as_mut() {
            Some(activation) => {
                activation.display = activation.display.toggled();
                true
            }
            None => false,
        }
    }

    pub fn webcam(&self) -> Option<&FrameStreamSession> {
        match self.activation.as_ref().map(|a| &a.resources) {
            Some(ModeResources::Webcam(session)) => Some(session),
            _ => None,
        }
    }

    pub fn webcam_mut(&mut self) -> Option<&mut FrameStreamSession> {
        match self.activation.as_mut().map(|a| &mut a.resources) {
            Some(ModeResources::Webcam(session)) => Some(session),
            _ => None,
        }
    }

    pub fn upload(&self) -> Option<&UploadScreen> {
        match self.activation.as_ref().map(|a| &a.resources) {
            Some(ModeResources::Upload(screen)) => Some(screen),
            _ => None,
        }
    }

    pub fn upload_mut(&mut self) -> Option<&mut UploadScreen> {
        match self.activation.as_mut().map(|a| &mut a.resources) {
            Some(ModeResources::Upload(screen)) => Some(screen),
            _ => None,
        }
    }
}
