//! File path prompt for the upload screens

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use cartoonify_core::MediaKind;

use crate::theme::{palette, styles};

pub struct PathPrompt<'a> {
    kind: MediaKind,
    text: &'a str,
    editable: bool,
}

impl<'a> PathPrompt<'a> {
    pub fn new(kind: MediaKind, text: &'a str) -> Self {
        Self {
            kind,
            text,
            editable: true,
        }
    }

    /// Render without a cursor (while a job is running)
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }
}

impl Widget for PathPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.kind {
            MediaKind::Image => " Image file (jpeg/png) ",
            MediaKind::Video => " Video file ",
        };
        let block = styles::glass_block(self.editable).title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut spans = vec![Span::styled("> ", styles::accent_bold())];
        if self.text.is_empty() && self.editable {
            spans.push(Span::styled("_", Style::default().fg(palette::STATUS_YELLOW)));
            spans.push(Span::styled(
                " type or paste a path, Enter to upload",
                styles::text_muted(),
            ));
        } else {
            // Keep the end of long paths visible
            let room = (inner.width as usize).saturating_sub(3);
            let count = self.text.chars().count();
            let shown: String = if count > room {
                let tail: String = self.text.chars().skip(count - room + 1).collect();
                format!("…{tail}")
            } else {
                self.text.to_string()
            };
            spans.push(Span::styled(shown, styles::text_primary()));
            if self.editable {
                spans.push(Span::styled("_", Style::default().fg(palette::STATUS_YELLOW)));
            }
        }
        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
