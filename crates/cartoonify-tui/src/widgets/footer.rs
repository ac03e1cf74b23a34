//! Footer with key hints and a status line

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::styles;

/// One `key: action` hint
pub type KeyHint = (&'static str, &'static str);

pub struct Footer<'a> {
    hints: &'a [KeyHint],
    status: Option<Line<'a>>,
    compact: bool,
}

impl<'a> Footer<'a> {
    pub fn new(hints: &'a [KeyHint]) -> Self {
        Self {
            hints,
            status: None,
            compact: false,
        }
    }

    /// Right-hand status text
    pub fn status(mut self, status: Line<'a>) -> Self {
        self.status = Some(status);
        self
    }

    /// Show only key names
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(styles::border_inactive());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut spans = vec![Span::raw(" ")];
        for (i, (key, action)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" · ", styles::text_muted()));
            }
            spans.push(Span::styled(*key, styles::keybinding()));
            if !self.compact {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(*action, styles::text_secondary()));
            }
        }
        let hints = Line::from(spans);
        let hints_width = hints.width() as u16;

        let Some(status) = self.status else {
            Paragraph::new(hints).render(inner, buf);
            return;
        };

        // Status wins over hints when both do not fit
        let status_width = (status.width() as u16).min(inner.width);
        if hints_width + status_width + 1 <= inner.width {
            Paragraph::new(hints).render(inner, buf);
            let x = inner.x + inner.width - status_width;
            Paragraph::new(status).render(Rect::new(x, inner.y, status_width, 1), buf);
        } else {
            Paragraph::new(status).render(inner, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    const HINTS: &[KeyHint] = &[("Esc", "back"), ("Tab", "toggle")];

    #[test]
    fn test_full_hints() {
        let mut term = TestTerminal::with_size(60, 2);
        term.render_widget(Footer::new(HINTS), term.area());
        assert!(term.buffer_contains("Esc back"));
        assert!(term.buffer_contains("Tab toggle"));
    }

    #[test]
    fn test_compact_hints() {
        let mut term = TestTerminal::with_size(30, 2);
        term.render_widget(Footer::new(HINTS).compact(true), term.area());
        assert!(term.buffer_contains("Esc · Tab"));
        assert!(!term.buffer_contains("back"));
    }

    #[test]
    fn test_status_right_aligned() {
        let mut term = TestTerminal::with_size(60, 2);
        term.render_widget(
            Footer::new(HINTS).status(Line::raw("12 frames")),
            term.area(),
        );
        assert!(term.line_contains(1, "Esc back"));
        assert!(term.line_contains(1, "12 frames"));
        assert_eq!(term.cell_at(59, 1), Some("s"));
    }

    #[test]
    fn test_status_replaces_hints_when_crowded() {
        let mut term = TestTerminal::with_size(24, 2);
        term.render_widget(
            Footer::new(HINTS).status(Line::raw("Service unreachable")),
            term.area(),
        );
        assert!(term.buffer_contains("Service unreachable"));
        assert!(!term.buffer_contains("toggle"));
    }
}
