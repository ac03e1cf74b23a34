//! Custom widget components

mod footer;
mod header;
mod path_input;
pub mod preview;
mod progress;
mod start_menu;

pub use footer::{Footer, KeyHint};
pub use header::MainHeader;
pub use path_input::PathPrompt;
pub use preview::{ImagePreview, PreviewCache};
pub use progress::JobProgress;
pub use start_menu::{BootSplash, StartMenuView};
