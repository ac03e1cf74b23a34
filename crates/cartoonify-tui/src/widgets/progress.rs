//! Job progress gauge

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Gauge, Widget},
};

use cartoonify_app::ProcessingJob;
use cartoonify_core::JobStatus;

use crate::theme::{palette, styles};

pub struct JobProgress<'a> {
    job: &'a ProcessingJob,
}

impl<'a> JobProgress<'a> {
    pub fn new(job: &'a ProcessingJob) -> Self {
        Self { job }
    }

    fn label(&self) -> String {
        let progress = self.job.progress().value();
        let (icon, _) = styles::job_indicator(self.job.status());
        match self.job.status() {
            JobStatus::Idle => format!("{icon} Waiting for a file"),
            JobStatus::Running if self.job.uses_estimator() => {
                format!("{icon} Processing ~{progress}%")
            }
            JobStatus::Running => format!("{icon} Processing"),
            JobStatus::Succeeded => format!("{icon} Done {progress}%"),
            JobStatus::Failed => format!("{icon} Failed at {progress}%"),
        }
    }
}

impl Widget for JobProgress<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (_, status_style) = styles::job_indicator(self.job.status());
        let fill = match self.job.status() {
            JobStatus::Failed => palette::STATUS_RED,
            JobStatus::Succeeded => palette::STATUS_GREEN,
            _ => palette::GAUGE_FILL,
        };

        Gauge::default()
            .block(styles::glass_block(false).title(" Progress "))
            .gauge_style(Style::default().fg(fill).bg(palette::GAUGE_TRACK))
            .label(ratatui::text::Span::styled(self.label(), status_style))
            .ratio(self.job.progress().ratio())
            .render(area, buf);
    }
}
