//! Keyboard input independent of the terminal library.
//!
//! The TUI converts crossterm key events into [`InputKey`] at its boundary so
//! the update logic can be driven from tests without a terminal.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Printable character
    Char(char),
    /// Character with Ctrl held (Ctrl+c, Ctrl+u)
    CharCtrl(char),

    Up,
    Down,
    Left,
    Right,

    Enter,
    Esc,
    Tab,
    Backspace,
}

impl InputKey {
    /// Whether the key can be inserted into a text prompt
    pub fn is_text(&self) -> bool {
        matches!(self, InputKey::Char(c) if !c.is_control())
    }
}
