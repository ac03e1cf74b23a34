//! Main render/view function (View in TEA pattern)


use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Block;
use ratatui::Frame;

use cartoonify_app::state::AppState;
use cartoonify_app::StreamView;
use cartoonify_core::{JobStatus, Mode};

use crate::layout;
use crate::theme::{palette, styles};
use crate::widgets::{self, KeyHint, PreviewCache};

const BOOT_HINTS: &[KeyHint] = &[("Enter", "skip"), ("q", "quit")];
const START_HINTS: &[KeyHint] = &[
    ("↑↓", "select"),
    ("Enter", "open"),
    ("1-3", "shortcut"),
    ("q", "quit"),
];
const WEBCAM_HINTS: &[KeyHint] = &[("Esc", "back"), ("t", "toggle view")];
const UPLOAD_HINTS: &[KeyHint] = &[("Enter", "upload"), ("Tab", "toggle view"), ("Esc", "back")];

fn hints_for(mode: Mode) -> &'static [KeyHint] {
    match mode {
        Mode::Booting => BOOT_HINTS,
        Mode::Start => START_HINTS,
        Mode::Webcam => WEBCAM_HINTS,
        Mode::Image | Mode::Video => UPLOAD_HINTS,
    }
}

/// Render the complete UI (View function in TEA)
///
/// `previews` keeps decoded images between draws; it is emptied whenever no
/// webcam or upload screen is open.
pub fn view(frame: &mut Frame, state: &AppState, previews: &mut PreviewCache) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let areas = layout::create(area);

    let mut header = widgets::MainHeader::new(state.mode());
    if state.mode().is_active() {
        header = header.with_display(state.modes.display());
    }
    frame.render_widget(header, areas.header);

    match state.mode() {
        Mode::Booting => {
            previews.clear();
            frame.render_widget(widgets::BootSplash, areas.body);
        }
        Mode::Start => {
            previews.clear();
            frame.render_widget(widgets::StartMenuView::new(&state.menu), areas.body);
        }
        Mode::Webcam => render_webcam(frame, state, areas.body, previews),
        Mode::Image | Mode::Video => render_upload(frame, state, areas.body, previews),
    }

    let mut footer = widgets::Footer::new(hints_for(state.mode()))
        .compact(layout::use_compact_footer(area));
    if let Some(status) = status_line(state) {
        footer = footer.status(status);
    }
    frame.render_widget(footer, areas.footer);
}

fn render_webcam(frame: &mut Frame, state: &AppState, area: Rect, previews: &mut PreviewCache) {
    let Some(session) = state.modes.webcam() else {
        return;
    };

    let preview = match session.view() {
        StreamView::Live => widgets::ImagePreview::new(
            session
                .latest()
                .map(|f| f.payload(state.modes.display())),
        ),
        StreamView::Connecting => {
            widgets::ImagePreview::new(None).placeholder("Connecting to webcam...")
        }
        StreamView::Unavailable => {
            widgets::ImagePreview::new(None).placeholder("Webcam unavailable")
        }
    };
    frame.render_stateful_widget(preview, area, previews);
}

fn render_upload(frame: &mut Frame, state: &AppState, area: Rect, previews: &mut PreviewCache) {
    let Some(screen) = state.modes.upload() else {
        return;
    };
    let job = screen.job();
    let areas = layout::upload(area);

    frame.render_widget(
        widgets::PathPrompt::new(screen.kind(), screen.path_input())
            .editable(job.status() != JobStatus::Running),
        areas.prompt,
    );
    frame.render_widget(widgets::JobProgress::new(job), areas.progress);

    let result = job.result();
    let placeholder = match job.status() {
        JobStatus::Running => "Cartoonifying...",
        JobStatus::Failed => "No result",
        // Video replies may carry only a status message
        JobStatus::Succeeded => result
            .and_then(|r| r.message.as_deref())
            .unwrap_or("Processed, no preview returned"),
        _ => "Result will appear here",
    };
    frame.render_stateful_widget(
        widgets::ImagePreview::new(result.and_then(|r| r.payload(state.modes.display())))
            .placeholder(placeholder),
        areas.preview,
        previews,
    );
}

/// Footer status: connection info for the webcam, job outcome for uploads
fn status_line(state: &AppState) -> Option<Line<'static>> {
    match state.mode() {
        Mode::Webcam => {
            let session = state.modes.webcam()?;
            if let Some(error) = session.error() {
                return Some(Line::styled(format!("{error} "), styles::error_text()));
            }
            let (icon, style) = styles::stream_indicator(session.state());
            let mut spans = vec![
                Span::styled(icon, style),
                Span::styled(format!(" {}", session.state().label()), style),
            ];
            if let Some(frame) = session.latest() {
                spans.push(Span::styled(
                    format!(
                        " · {} frames · {} ",
                        session.frames_received(),
                        frame.captured_at.format("%H:%M:%S")
                    ),
                    styles::text_muted(),
                ));
            } else {
                spans.push(Span::raw(" "));
            }
            Some(Line::from(spans))
        }
        Mode::Image | Mode::Video => {
            let screen = state.modes.upload()?;
            if let Some(rejection) = screen.rejection() {
                return Some(Line::styled(format!("{rejection} "), styles::error_text()));
            }
            let job = screen.job();
            if let Some(error) = job.error() {
                return Some(Line::styled(format!("{error} "), styles::error_text()));
            }
            let file = job.file()?.file_name();
            let (icon, style) = styles::job_indicator(job.status());
            Some(Line::from(vec![
                Span::styled(icon, style),
                Span::styled(format!(" {} ", job.status().label()), style),
                Span::styled(format!("{file} "), styles::text_secondary()),
            ]))
        }
        Mode::Booting | Mode::Start => None,
    }
}
