//! Single-file processing jobs and their synthetic progress estimator
//!
//! A [`ProcessingJob`] moves `Idle → Running → (Succeeded | Failed)` exactly
//! once. Video jobs own an [`EstimatorHandle`] for the background ticker that
//! advances the progress estimate; the ticker is stopped in both terminal
//! states and whenever the job is abandoned.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use cartoonify_core::prelude::*;
use cartoonify_core::{JobStatus, MediaKind, ProcessingResult, ProgressEstimate, SelectedFile};

/// Unique identifier for a job
pub type JobId = u64;

static JOB_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique job ID
pub fn next_job_id() -> JobId {
    JOB_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

// ─────────────────────────────────────────────────────────────────────────────
// Estimator Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Stop capability for a running progress ticker.
///
/// Stopping is idempotent and also happens on drop.
#[derive(Debug)]
pub struct EstimatorHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl EstimatorHandle {
    pub fn new(shutdown_tx: watch::Sender<bool>, task: Option<JoinHandle<()>>) -> Self {
        Self { shutdown_tx, task }
    }

    pub fn stop(&mut self) {
        self.shutdown_tx.send_replace(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Receiver that flips to `true` once the ticker is stopped
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }
}

impl Drop for EstimatorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Processing Job
// ─────────────────────────────────────────────────────────────────────────────

/// One upload-and-process operation for a single file
#[derive(Debug)]
pub struct ProcessingJob {
    id: JobId,
    kind: MediaKind,
    file: Option<SelectedFile>,
    status: JobStatus,
    progress: ProgressEstimate,
    result: Option<ProcessingResult>,
    error: Option<String>,
    estimator: Option<EstimatorHandle>,
}

impl ProcessingJob {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            id: next_job_id(),
            kind,
            file: None,
            status: JobStatus::Idle,
            progress: ProgressEstimate::new(),
            result: None,
            error: None,
            estimator: None,
        }
    }

    /// Begin processing `file`.
    ///
    /// Only legal from `Idle`. A file whose media type this job's kind does not
    /// accept is rejected and the job stays `Idle`.
    pub fn start(&mut self, file: SelectedFile) -> Result<()> {
        if self.status != JobStatus::Idle {
            return Err(Error::invalid_transition(format!(
                "job {} cannot start from {}",
                self.id,
                self.status.label()
            )));
        }
        file.classify(self.kind)?;

        info!(
            "Job {} started: {} '{}'",
            self.id,
            self.kind.label(),
            file.path.display()
        );
        self.file = Some(file);
        self.status = JobStatus::Running;
        Ok(())
    }

    /// Whether this job shows a synthetic progress estimate
    pub fn uses_estimator(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Take ownership of a ticker. A job that is no longer running stops it
    /// immediately. Returns whether the handle was kept.
    pub fn attach_estimator(&mut self, mut handle: EstimatorHandle) -> bool {
        if self.status != JobStatus::Running {
            handle.stop();
            return false;
        }
        if let Some(mut old) = self.estimator.replace(handle) {
            old.stop();
        }
        true
    }

    /// Advance the estimate by one tick. Ignored unless running.
    ///
    /// The ticker is stopped once the estimate reaches the cap; nothing moves
    /// again until the job finishes.
    pub fn tick(&mut self, step: u8) -> bool {
        if self.status != JobStatus::Running {
            return false;
        }
        let changed = self.progress.advance(step);
        if self.progress.is_capped() && self.estimator.is_some() {
            debug!("Job {} estimate capped at {}", self.id, self.progress.value());
            self.stop_estimator();
        }
        changed
    }

    /// Record success. Returns false if the job was not running.
    pub fn succeed(&mut self, result: ProcessingResult) -> bool {
        if self.status != JobStatus::Running {
            return false;
        }
        self.stop_estimator();
        self.progress.complete();
        if let Some(message) = &result.message {
            debug!("Job {} service message: {}", self.id, message);
        }
        self.result = Some(result);
        self.status = JobStatus::Succeeded;
        info!("Job {} succeeded", self.id);
        true
    }

    /// Record failure, holding the estimate at its last value.
    /// Returns false if the job was not running.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.status != JobStatus::Running {
            return false;
        }
        self.stop_estimator();
        let message = message.into();
        warn!("Job {} failed: {}", self.id, message);
        self.error = Some(message);
        self.status = JobStatus::Failed;
        true
    }

    /// Stop background work on external teardown. A still-running remote call
    /// is left to complete; its result will not match any live job.
    pub fn abandon(&mut self) {
        if self.status == JobStatus::Running {
            debug!("Job {} abandoned while running", self.id);
        }
        self.stop_estimator();
    }

    fn stop_estimator(&mut self) {
        if let Some(mut handle) = self.estimator.take() {
            handle.stop();
        }
    }

    pub fn estimator_running(&self) -> bool {
        self.estimator.as_ref().is_some_and(|h| !h.is_stopped())
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn progress(&self) -> ProgressEstimate {
        self.progress
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
