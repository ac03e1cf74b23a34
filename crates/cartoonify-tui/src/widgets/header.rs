//! Header bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use cartoonify_core::{DisplayVariant, Mode};

use crate::theme::{palette, styles};

/// Title bar with the app name, current mode and displayed variant
pub struct MainHeader {
    mode: Mode,
    display: Option<DisplayVariant>,
}

impl MainHeader {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            display: None,
        }
    }

    /// Show which half of the result pair is on screen
    pub fn with_display(mut self, display: DisplayVariant) -> Self {
        self.display = Some(display);
        self
    }
}

impl Widget for MainHeader {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut spans = vec![
            Span::raw(" "),
            Span::styled("Cartoonify", styles::accent_bold()),
        ];
        if self.mode.is_active() {
            spans.push(Span::styled(" / ", styles::text_muted()));
            spans.push(Span::styled(self.mode.title(), styles::text_secondary()));
        }
        let left = Line::from(spans);
        let left_width = left.width() as u16;
        Paragraph::new(left).render(inner, buf);

        // Right-aligned variant badge, dropped when it would overlap the title
        if let Some(display) = self.display {
            let badge = match display {
                DisplayVariant::Cartoon => " [Cartoon] ",
                DisplayVariant::Original => " [Original] ",
            };
            let badge_width = badge.chars().count() as u16;
            if left_width + badge_width < inner.width {
                let x = inner.x + inner.width - badge_width;
                let badge_area = Rect::new(x, inner.y, badge_width, 1);
                Paragraph::new(Span::styled(badge, styles::keybinding())).render(badge_area, buf);
            }
        }
    }
}
