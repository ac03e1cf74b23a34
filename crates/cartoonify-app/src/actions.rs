//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every task spawned here reports back through the message channel. Tasks
//! that outlive a single request (the stream forwarder and the progress
//! ticker) also watch their activation's cancellation signal, and hand a stop
//! capability back as a [`Spawned`] value so the caller can attach it to state.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use cartoonify_client::{submit, ProcessingClient, StreamCloser, StreamEvent};
use cartoonify_core::prelude::*;
use cartoonify_core::{MediaKind, ProcessingResult, SelectedFile, StreamMessage, Upload};

use crate::handler::UpdateAction;
use crate::job::{EstimatorHandle, JobId};
use crate::message::Message;
use crate::mode::ActivationId;

/// Long-lived resource created by an action, to be owned by state
#[derive(Debug)]
pub enum Spawned {
    Stream {
        activation: ActivationId,
        closer: StreamCloser,
    },
    Estimator {
        activation: ActivationId,
        job_id: JobId,
        handle: EstimatorHandle,
    },
}

/// Execute an action by spawning background tasks
pub fn handle_action<C>(
    action: UpdateAction,
    client: &C,
    msg_tx: mpsc::Sender<Message>,
) -> Option<Spawned>
where
    C: ProcessingClient + Clone + Sync + 'static,
{
    match action {
        UpdateAction::OpenFrameStream { activation, cancel } => {
            let (events, closer) = client.open_frame_stream().into_parts();
            spawn_stream_forwarder(activation, events, cancel, msg_tx);
            Some(Spawned::Stream { activation, closer })
        }

        UpdateAction::SubmitUpload {
            activation,
            job_id,
            kind,
            file,
            cancel,
            estimator,
        } => {
            spawn_upload(
                client.clone(),
                activation,
                job_id,
                kind,
                file,
                cancel.clone(),
                msg_tx.clone(),
            );
            estimator.map(|plan| Spawned::Estimator {
                activation,
                job_id,
                handle: spawn_estimator(activation, job_id, plan.interval, cancel, msg_tx),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Uploads
// ─────────────────────────────────────────────────────────────────────────────

fn spawn_upload<C>(
    client: C,
    activation: ActivationId,
    job_id: JobId,
    kind: MediaKind,
    file: SelectedFile,
    cancel: watch::Receiver<bool>,
    msg_tx: mpsc::Sender<Message>,
) where
    C: ProcessingClient + Sync + 'static,
{
    tokio::spawn(async move {
        let result = upload_file(&client, kind, &file).await;

        // The remote call is never cut short, but nobody wants the answer
        if *cancel.borrow() {
            debug!(
                "Job {} finished after its activation ended, discarding",
                job_id
            );
            return;
        }

        let _ = msg_tx
            .send(Message::JobFinished {
                activation,
                job_id,
                result: result.map_err(|e| e.to_string()),
            })
            .await;
    });
}

async fn upload_file<C>(client: &C, kind: MediaKind, file: &SelectedFile) -> Result<ProcessingResult>
where
    C: ProcessingClient + Sync,
{
    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|e| Error::file_read(&file.path, e.to_string()))?;
    debug!(
        "Read {} bytes from {}",
        bytes.len(),
        file.path.display()
    );
    submit(client, kind, Upload::new(file, bytes)).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Progress Estimator
// ─────────────────────────────────────────────────────────────────────────────

/// Spawn the ticker that drives a job's synthetic progress estimate.
///
/// Runs until the returned handle is stopped, the activation is cancelled or
/// the message channel closes.
pub fn spawn_estimator(
    activation: ActivationId,
    job_id: JobId,
    interval: Duration,
    mut cancel: watch::Receiver<bool>,
    msg_tx: mpsc::Sender<Message>,
) -> EstimatorHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = cancel.changed() => break,
                _ = ticker.tick() => {
                    if msg_tx
                        .send(Message::ProgressTick { activation, job_id })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
        debug!("Progress estimator for job {} stopped", job_id);
    });

    EstimatorHandle::new(shutdown_tx, Some(task))
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Stream
// ─────────────────────────────────────────────────────────────────────────────

fn spawn_stream_forwarder(
    activation: ActivationId,
    mut events: mpsc::Receiver<StreamEvent>,
    mut cancel: watch::Receiver<bool>,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                _ = cancel.changed() => {
                    debug!("Stream forwarder for activation {} cancelled", activation);
                    return;
                }
                event = events.recv() => match event {
                    Some(event) => event,
                    None => return,
                },
            };

            let (latest, held) = latest_frame(event, &mut events);
            for event in std::iter::once(latest).chain(held) {
                let terminal = event.is_terminal();
                if msg_tx
                    .send(Message::Stream { activation, event })
                    .await
                    .is_err()
                    || terminal
                {
                    return;
                }
            }
        }
    });
}

fn is_frame(event: &StreamEvent) -> bool {
    matches!(event, StreamEvent::Message(StreamMessage::Frame(_)))
}

/// Collapse a burst of already-queued frames into the newest one.
///
/// Returns the event to deliver plus the first non-frame event found behind
/// it, which must still be delivered in order.
fn latest_frame(
    first: StreamEvent,
    events: &mut mpsc::Receiver<StreamEvent>,
) -> (StreamEvent, Option<StreamEvent>) {
    if !is_frame(&first) {
        return (first, None);
    }

    let mut latest = first;
    let mut skipped = 0usize;
    while let Ok(next) = events.try_recv() {
        if !is_frame(&next) {
            return (latest, Some(next));
        }
        latest = next;
        skipped += 1;
    }
    if skipped > 0 {
        trace!("Skipped {} stale frames", skipped);
    }
    (latest, None)
}

// ─────────────────────────────────────────────────────────────────────────────
// Startup
// ─────────────────────────────────────────────────────────────────────────────

/// Send `BootComplete` after the warm-up delay
pub fn spawn_boot_timer(delay: Duration, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = msg_tx.send(Message::BootComplete).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartoonify_core::{Frame, ImagePayload};

    fn frame(cartoon: &str) -> StreamEvent {
        StreamEvent::Message(StreamMessage::Frame(Frame::new(
            ImagePayload::new("o"),
            ImagePayload::new(cartoon),
        )))
    }

    fn cartoon_of(event: &StreamEvent) -> Option<&str> {
        match event {
            StreamEvent::Message(StreamMessage::Frame(f)) => Some(f.cartoon.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_latest_frame_collapses_queued_frames() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.try_send(frame("F2")).unwrap();
        tx.try_send(frame("F3")).unwrap();

        let (latest, held) = latest_frame(frame("F1"), &mut rx);
        assert_eq!(cartoon_of(&latest), Some("F3"));
        assert!(held.is_none());
    }

    #[test]
    fn test_latest_frame_preserves_following_event() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.try_send(frame("F2")).unwrap();
        tx.try_send(StreamEvent::Ended).unwrap();
        tx.try_send(frame("F3")).unwrap();

        let (latest, held) = latest_frame(frame("F1"), &mut rx);
        assert_eq!(cartoon_of(&latest), Some("F2"));
        assert_eq!(held, Some(StreamEvent::Ended));
        // F3 stays queued for the next round
        assert_eq!(cartoon_of(&rx.try_recv().unwrap()), Some("F3"));
    }

    #[test]
    fn test_latest_frame_passes_non_frames_through() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.try_send(frame("F1")).unwrap();

        let (event, held) = latest_frame(StreamEvent::Opened, &mut rx);
        assert_eq!(event, StreamEvent::Opened);
        assert!(held.is_none());
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_estimator_ticks_until_stopped() {
        let (msg_tx, mut msg_rx) = mpsc::channel(16);
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let mut handle = spawn_estimator(7, 42, Duration::from_millis(500), cancel_rx, msg_tx);

        for _ in 0..3 {
            match msg_rx.recv().await {
                Some(Message::ProgressTick { activation, job_id }) => {
                    assert_eq!((activation, job_id), (7, 42));
                }
                other => panic!("expected tick, got {other:?}"),
            }
        }

        handle.stop();
        // Task is aborted, so the sender drops and the channel drains to None
        assert!(msg_rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_estimator_stops_on_activation_cancel() {
        let (msg_tx, mut msg_rx) = mpsc::channel(16);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let _handle = spawn_estimator(1, 1, Duration::from_millis(500), cancel_rx, msg_tx);

        assert!(matches!(
            msg_rx.recv().await,
            Some(Message::ProgressTick { .. })
        ));
        cancel_tx.send_replace(true);
        assert!(msg_rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_boot_timer_fires_after_delay() {
        let (msg_tx, mut msg_rx) = mpsc::channel(1);
        spawn_boot_timer(Duration::from_millis(1500), msg_tx);

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert!(msg_rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(matches!(msg_rx.recv().await, Some(Message::BootComplete)));
    }
}
