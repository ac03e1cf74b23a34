//! cartoonify-tui - Terminal UI for Cartoonify
//!
//! Builds an Engine from cartoonify-app and adds terminal rendering, event
//! polling and the widgets that draw each mode.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::run;
