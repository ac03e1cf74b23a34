//! Key event handlers for each mode

use cartoonify_core::Mode;

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::AppState;

/// Convert key events to messages based on the current mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit from anywhere
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    match state.mode() {
        Mode::Booting => handle_key_booting(key),
        Mode::Start => handle_key_start(state, key),
        Mode::Webcam => handle_key_webcam(key),
        Mode::Image | Mode::Video => handle_key_upload(state, key),
    }
}

/// Warm-up screen: any confirm key skips the delay
fn handle_key_booting(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::Quit),
        InputKey::Enter | InputKey::Char(' ') => Some(Message::BootComplete),
        _ => None,
    }
}

fn handle_key_start(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::Quit),
        InputKey::Up | InputKey::Char('k') => Some(Message::MenuUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::MenuDown),
        InputKey::Enter => Some(Message::MenuConfirm),
        InputKey::Char(c) => c
            .to_digit(10)
            .and_then(|n| state.menu.entry(n as usize))
            .map(Message::SelectMode),
        _ => None,
    }
}

fn handle_key_webcam(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc | InputKey::Char('b') => Some(Message::Back),
        InputKey::Char('t') | InputKey::Char(' ') | InputKey::Tab => Some(Message::ToggleDisplay),
        _ => None,
    }
}

/// Upload screens capture printable keys for the path prompt, so only Esc
/// leaves the mode and Tab toggles the display.
fn handle_key_upload(state: &AppState, key: InputKey) -> Option<Message> {
    let current = state
        .modes
        .upload()
        .map(|screen| screen.path_input())
        .unwrap_or_default();

    match key {
        InputKey::Esc => Some(Message::Back),
        InputKey::Tab => Some(Message::ToggleDisplay),
        InputKey::Enter => Some(Message::SubmitPath),
        InputKey::Backspace => {
            let mut text = current.to_string();
            text.pop();
            Some(Message::PathInput { text })
        }
        InputKey::CharCtrl('u') => Some(Message::PathInput {
            text: String::new(),
        }),
        InputKey::Char(c) if key.is_text() => {
            let mut text = current.to_string();
            text.push(c);
            Some(Message::PathInput { text })
        }
        _ => None,
    }
}
