//! Screen layout definitions

use ratatui::layout::{Constraint, Layout, Rect};

/// Minimum terminal width for the full footer hints
pub const MIN_FULL_FOOTER_WIDTH: u16 = 60;

/// Screen areas for the main layout
pub struct ScreenAreas {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Create the main screen layout
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(3),    // Body
        Constraint::Length(2), // Footer (1 for border + 1 for content)
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}

/// Areas inside the body of an upload screen
pub struct UploadAreas {
    pub prompt: Rect,
    pub progress: Rect,
    pub preview: Rect,
}

pub fn upload(body: Rect) -> UploadAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Path prompt
        Constraint::Length(3), // Progress gauge
        Constraint::Min(1),    // Result preview
    ])
    .split(body);

    UploadAreas {
        prompt: chunks[0],
        progress: chunks[1],
        preview: chunks[2],
    }
}

/// Check if we should use compact footer hints
pub fn use_compact_footer(area: Rect) -> bool {
    area.width < MIN_FULL_FOOTER_WIDTH
}

/// Rect of `width` x `height` centered inside `area`, clamped to it
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
