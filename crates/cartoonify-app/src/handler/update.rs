//! Main update function - handles state transitions (TEA pattern)

use cartoonify_client::StreamEvent;
use cartoonify_core::prelude::*;
use cartoonify_core::{Mode, ProcessingResult, SelectedFile};

use crate::job::JobId;
use crate::message::Message;
use crate::mode::ActivationId;
use crate::state::AppState;
use crate::upload::expand_path;

use super::{keys::handle_key, EstimatorPlan, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            info!("Quit requested");
            state.quit();
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => UpdateResult::none(),

        Message::BootComplete => {
            state.modes.finish_boot();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Mode Messages
        // ─────────────────────────────────────────────────────────
        Message::MenuUp => {
            if state.mode() == Mode::Start {
                state.menu.up();
            }
            UpdateResult::none()
        }

        Message::MenuDown => {
            if state.mode() == Mode::Start {
                state.menu.down();
            }
            UpdateResult::none()
        }

        Message::MenuConfirm => match state.menu.selected_mode() {
            Some(mode) if state.mode() == Mode::Start => {
                UpdateResult::message(Message::SelectMode(mode))
            }
            _ => UpdateResult::none(),
        },

        Message::SelectMode(mode) => handle_select_mode(state, mode),

        Message::Back => {
            state.modes.back();
            UpdateResult::none()
        }

        Message::ToggleDisplay => {
            state.modes.toggle_display();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Upload Messages
        // ─────────────────────────────────────────────────────────
        Message::PathInput { text } => {
            if let Some(screen) = state.modes.upload_mut() {
                screen.set_path_input(text);
            }
            UpdateResult::none()
        }

        Message::Paste { text } => {
            if let Some(screen) = state.modes.upload_mut() {
                // Drag-and-drop pastes often end with a newline
                let pasted = text.trim_end_matches(['\r', '\n']);
                let combined = format!("{}{}", screen.path_input(), pasted);
                screen.set_path_input(combined);
            }
            UpdateResult::none()
        }

        Message::SubmitPath => handle_submit_path(state),

        Message::JobFinished {
            activation,
            job_id,
            result,
        } => handle_job_finished(state, activation, job_id, result),

        Message::ProgressTick { activation, job_id } => {
            let step = state.settings.progress.step();
            if let Some(job) = current_job(state, activation, job_id) {
                job.tick(step);
            }
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Stream Messages
        // ─────────────────────────────────────────────────────────
        Message::Stream { activation, event } => handle_stream_event(state, activation, event),
    }
}

fn handle_select_mode(state: &mut AppState, mode: Mode) -> UpdateResult {
    let activation = match state.modes.select(mode) {
        Ok(id) => id,
        Err(e) => {
            warn!("{}", e);
            return UpdateResult::none();
        }
    };

    if mode != Mode::Webcam {
        return UpdateResult::none();
    }

    match state.modes.activation() {
        Some(current) => UpdateResult::action(UpdateAction::OpenFrameStream {
            activation,
            cancel: current.cancel_signal(),
        }),
        None => UpdateResult::none(),
    }
}

fn handle_submit_path(state: &mut AppState) -> UpdateResult {
    let interval = state.settings.progress.interval();

    let Some(current) = state.modes.activation() else {
        return UpdateResult::none();
    };
    let activation = current.id();
    let cancel = current.cancel_signal();

    let Some(screen) = state.modes.upload_mut() else {
        return UpdateResult::none();
    };
    let Some(path) = expand_path(screen.path_input()) else {
        return UpdateResult::none();
    };

    let file = SelectedFile::from_path(path);
    let job_id = match screen.select_file(file.clone()) {
        Ok(id) => id,
        // Refusal is recorded on the screen; nothing is sent
        Err(_) => return UpdateResult::none(),
    };

    let job = screen.job();
    let estimator = job
        .uses_estimator()
        .then_some(EstimatorPlan { interval });

    UpdateResult::action(UpdateAction::SubmitUpload {
        activation,
        job_id,
        kind: job.kind(),
        file,
        cancel,
        estimator,
    })
}

fn handle_job_finished(
    state: &mut AppState,
    activation: ActivationId,
    job_id: JobId,
    result: std::result::Result<ProcessingResult, String>,
) -> UpdateResult {
    let Some(job) = current_job(state, activation, job_id) else {
        debug!(
            "Discarding result of job {} (activation {} no longer current)",
            job_id, activation
        );
        return UpdateResult::none();
    };

    match result {
        Ok(result) => {
            job.succeed(result);
        }
        Err(message) => {
            job.fail(message);
        }
    }
    UpdateResult::none()
}

fn handle_stream_event(
    state: &mut AppState,
    activation: ActivationId,
    event: StreamEvent,
) -> UpdateResult {
    if !state.modes.is_current(activation) {
        trace!("Dropping stream event for ended activation {}", activation);
        return UpdateResult::none();
    }
    if let Some(session) = state.modes.webcam_mut() {
        session.apply(event);
    }
    UpdateResult::none()
}

/// The running job `job_id` of `activation`, if both are still current
fn current_job(
    state: &mut AppState,
    activation: ActivationId,
    job_id: JobId,
) -> Option<&mut crate::job::ProcessingJob> {
    if !state.modes.is_current(activation) {
        return None;
    }
    state.modes.upload_mut()?.job_for(job_id)
}
