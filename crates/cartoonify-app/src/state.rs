//! Application state (Model in TEA pattern)

use cartoonify_core::Mode;

use crate::config::Settings;
use crate::mode::ModeController;

/// Entries and highlight of the start menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartMenu {
    entries: Vec<Mode>,
    selected: usize,
}

impl StartMenu {
    pub fn new(enable_video: bool) -> Self {
        let mut entries = vec![Mode::Webcam, Mode::Image];
        if enable_video {
            entries.push(Mode::Video);
        }
        Self {
            entries,
            selected: 0,
        }
    }

    pub fn entries(&self) -> &[Mode] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_mode(&self) -> Option<Mode> {
        self.entries.get(self.selected).copied()
    }

    /// Entry for a 1-based number shortcut
    pub fn entry(&self, number: usize) -> Option<Mode> {
        number
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .copied()
    }

    pub fn up(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.entries.len() - 1);
    }

    pub fn down(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.entries.len();
    }
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub modes: ModeController,
    pub menu: StartMenu,
    pub settings: Settings,
    quitting: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            modes: ModeController::new(settings.ui.default_display),
            menu: StartMenu::new(settings.ui.enable_video),
            settings,
            quitting: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn quit(&mut self) {
        self.quitting = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }
}
