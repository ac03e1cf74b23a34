//! State of the image/video upload screens

use std::path::PathBuf;

use cartoonify_core::prelude::*;
use cartoonify_core::{MediaKind, SelectedFile};

use crate::job::{JobId, ProcessingJob};

/// Turn prompt text into a path: surrounding quotes (as left by terminal
/// drag-and-drop) are stripped and a leading `~/` expands to the home dir.
pub fn expand_path(input: &str) -> Option<PathBuf> {
    let trimmed = input
        .trim()
        .trim_matches(|c: char| c == '\'' || c == '"')
        .trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Some(home.join(rest));
        }
    }
    Some(PathBuf::from(trimmed))
}

/// Path prompt plus the current job for one upload-mode activation
#[derive(Debug)]
pub struct UploadScreen {
    kind: MediaKind,
    job: ProcessingJob,
    /// Text typed into the path prompt
    path_input: String,
    /// Why the last selected file was refused before any request was made
    rejection: Option<String>,
}

impl UploadScreen {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            job: ProcessingJob::new(kind),
            path_input: String::new(),
            rejection: None,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn job(&self) -> &ProcessingJob {
        &self.job
    }

    pub fn job_mut(&mut self) -> &mut ProcessingJob {
        &mut self.job
    }

    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn path_input(&self) -> &str {
        &self.path_input
    }

    pub fn set_path_input(&mut self, text: impl Into<String>) {
        self.path_input = text.into();
    }

    /// Job for `job_id` if it is the current one
    pub fn job_for(&mut self, job_id: JobId) -> Option<&mut ProcessingJob> {
        (self.job.id() == job_id).then_some(&mut self.job)
    }

    /// Start a fresh job for `file`.
    ///
    /// An unsupported file is refused without creating a job: the current job
    /// and its result stay as they were. Otherwise the previous job is
    /// abandoned and replaced, discarding its result.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<JobId> {
        if let Err(e) = file.classify(self.kind) {
            warn!("Refusing {}: {}", file.path.display(), e);
            self.rejection = Some(e.to_string());
            return Err(e);
        }

        self.job.abandon();
        let mut job = ProcessingJob::new(self.kind);
        job.start(file)?;
        self.job = job;
        self.rejection = None;
        Ok(self.job.id())
    }

    /// Stop the current job's background work
    pub fn teardown(&mut self) {
        self.job.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartoonify_core::{ImagePayload, JobStatus, ProcessingResult};

    #[test]
    fn test_unsupported_file_creates_no_job() {
        let mut screen = UploadScreen::new(MediaKind::Image);
        let idle_id = screen.job().id();

        let err = screen
            .select_file(SelectedFile::from_path("notes.txt"))
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedType { .. }));
        assert_eq!(screen.job().id(), idle_id);
        assert_eq!(screen.job().status(), JobStatus::Idle);
        assert!(screen.rejection().unwrap().contains("text/plain"));
    }

    #[test]
    fn test_new_file_discards_previous_result() {
        let mut screen = UploadScreen::new(MediaKind::Image);
        let first = screen
            .select_file(SelectedFile::from_path("a.png"))
            .unwrap();
        screen.job_for(first).unwrap().succeed(ProcessingResult::new(
            ImagePayload::new("X"),
            ImagePayload::new("Y"),
        ));

        let second = screen
            .select_file(SelectedFile::from_path("b.jpg"))
            .unwrap();

        assert_ne!(first, second);
        assert!(screen.job_for(first).is_none());
        assert!(screen.job().result().is_none());
        assert_eq!(screen.job().status(), JobStatus::Running);
    }

    #[test]
    fn test_rejection_cleared_by_valid_file() {
        let mut screen = UploadScreen::new(MediaKind::Video);
        let _ = screen.select_file(SelectedFile::from_path("a.png"));
        assert!(screen.rejection().is_some());

        screen
            .select_file(SelectedFile::from_path("clip.mov"))
            .unwrap();
        assert!(screen.rejection().is_none());
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("   "), None);
        assert_eq!(expand_path("''"), None);
        assert_eq!(
            expand_path(" '/tmp/my cat.png' "),
            Some(PathBuf::from("/tmp/my cat.png"))
        );
        assert_eq!(expand_path("\"a.jpg\""), Some(PathBuf::from("a.jpg")));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/x.png"), Some(home.join("x.png")));
        }
    }
}
