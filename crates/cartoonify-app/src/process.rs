//! Message processing
//!
//! Runs the TEA update loop and hands resources created by actions to the
//! activation that asked for them.

use tokio::sync::mpsc;

use cartoonify_client::ProcessingClient;
use cartoonify_core::prelude::*;

use crate::actions::{handle_action, Spawned};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<C>(
    state: &mut AppState,
    message: Message,
    client: &C,
    msg_tx: &mpsc::Sender<Message>,
) where
    C: ProcessingClient + Clone + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            if let Some(spawned) = handle_action(action, client, msg_tx.clone()) {
                attach_spawned(state, spawned);
            }
        }

        // Continue with follow-up message
        msg = result.message;
    }
}

/// Give a spawned resource to its activation, or stop it if that activation
/// (or job) is no longer current.
fn attach_spawned(state: &mut AppState, spawned: Spawned) {
    match spawned {
        Spawned::Stream {
            activation,
            mut closer,
        } => {
            let session = state
                .modes
                .is_current(activation)
                .then(|| state.modes.webcam_mut())
                .flatten();
            match session {
                Some(session) => session.attach(closer),
                None => {
                    debug!("Closing stream for ended activation {}", activation);
                    closer.close();
                }
            }
        }

        Spawned::Estimator {
            activation,
            job_id,
            mut handle,
        } => {
            let job = state
                .modes
                .is_current(activation)
                .then(|| state.modes.upload_mut())
                .flatten()
                .and_then(|screen| screen.job_for(job_id));
            match job {
                Some(job) => {
                    job.attach_estimator(handle);
                }
                None => {
                    debug!("Stopping estimator for stale job {}", job_id);
                    handle.stop();
                }
            }
        }
    }
}
