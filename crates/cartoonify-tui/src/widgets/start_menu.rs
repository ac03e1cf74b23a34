//! Start menu and warm-up splash

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use cartoonify_app::StartMenu;
use cartoonify_core::Mode;

use crate::layout;
use crate::theme::styles;

fn entry_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Webcam => "Live webcam",
        Mode::Image => "Cartoonify an image",
        Mode::Video => "Cartoonify a video",
        Mode::Booting | Mode::Start => "",
    }
}

/// Numbered list of selectable modes
pub struct StartMenuView<'a> {
    menu: &'a StartMenu,
}

impl<'a> StartMenuView<'a> {
    pub fn new(menu: &'a StartMenu) -> Self {
        Self { menu }
    }
}

impl Widget for StartMenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![
            Line::styled("Choose a mode", styles::text_secondary()),
            Line::raw(""),
        ];
        for (i, mode) in self.menu.entries().iter().enumerate() {
            let text = format!(" {}  {} ", i + 1, entry_label(*mode));
            let style = if i == self.menu.selected_index() {
                styles::focused_selected()
            } else {
                styles::text_primary()
            };
            lines.push(Line::from(Span::styled(text, style)));
        }

        let height = lines.len() as u16;
        let target = layout::centered(area, area.width, height);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(target, buf);
    }
}

/// Splash shown while warming up
pub struct BootSplash;

impl Widget for BootSplash {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::styled("Cartoonify", styles::accent_bold()),
            Line::raw(""),
            Line::styled("Warming up...", styles::text_secondary()),
        ];
        let target = layout::centered(area, area.width, lines.len() as u16);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(target, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_menu_lists_numbered_entries() {
        let menu = StartMenu::new(false);
        let mut term = TestTerminal::with_size(50, 10);
        term.render_widget(StartMenuView::new(&menu), term.area());

        assert!(term.buffer_contains("1  Live webcam"));
        assert!(term.buffer_contains("2  Cartoonify an image"));
        assert!(!term.buffer_contains("video"));
    }

    #[test]
    fn test_menu_highlights_selection() {
        let mut menu = StartMenu::new(true);
        menu.down();
        let mut term = TestTerminal::with_size(50, 10);
        term.render_widget(StartMenuView::new(&menu), term.area());

        let content = term.content();
        let row = content
            .lines()
            .position(|l| l.contains("Cartoonify an image"))
            .unwrap() as u16;
        let col = content.lines().nth(row as usize).unwrap().find('2').unwrap() as u16;
        assert_eq!(
            term.buffer()[(col, row)].bg,
            crate::theme::palette::ACCENT
        );
    }

    #[test]
    fn test_boot_splash() {
        let mut term = TestTerminal::with_size(40, 8);
        term.render_widget(BootSplash, term.area());
        assert!(term.buffer_contains("Warming up"));
    }
}
