//! Engine - orchestration state shared by the TUI runner and tests
//!
//! Owns the TEA state, the message channel every background task reports
//! into, and the processing client actions are dispatched against.

use tokio::sync::mpsc;

use cartoonify_client::ProcessingClient;
use cartoonify_core::prelude::*;

use crate::actions;
use crate::config::Settings;
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::AppState;

/// Capacity of the unified message channel
pub const MESSAGE_CHANNEL_CAPACITY: usize = 256;

pub struct Engine<C> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    pub msg_rx: mpsc::Receiver<Message>,

    client: C,
}

impl<C> Engine<C>
where
    C: ProcessingClient + Clone + Sync + 'static,
{
    pub fn new(settings: Settings, client: C) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);
        Self {
            state: AppState::with_settings(settings),
            msg_tx,
            msg_rx,
            client,
        }
    }

    /// Begin the warm-up period. With a zero warm-up the start menu is shown
    /// immediately.
    pub fn start(&mut self) {
        let warmup = self.state.settings.ui.warmup();
        if warmup.is_zero() {
            self.process_message(Message::BootComplete);
        } else {
            debug!("Warming up for {:?}", warmup);
            actions::spawn_boot_timer(warmup, self.msg_tx.clone());
        }
    }

    /// Listen for SIGINT/SIGTERM and turn them into `Message::Quit`
    pub fn spawn_signal_handler(&self) {
        signals::spawn_signal_handler(self.msg_tx.clone());
    }

    /// Process a single message through the TEA update cycle
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(&mut self.state, msg, &self.client, &self.msg_tx);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message from a background task
    pub async fn next_message(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Tear down the active mode, closing its stream and stopping its tickers
    pub fn shutdown(&mut self) {
        if let Some(activation) = self.state.modes.back() {
            info!("Ended activation {} on shutdown", activation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use cartoonify_client::test_utils::{FakeProcessingClient, FakeReply};
    use cartoonify_client::StreamEvent;
    use cartoonify_core::{
        Frame, ImagePayload, JobStatus, MediaKind, Mode, ProcessingResult, StreamMessage,
    };
    use tempfile::TempDir;

    use crate::input_key::InputKey;

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.ui.warmup_ms = 0;
        settings.ui.enable_video = true;
        settings
    }

    fn started_engine(client: FakeProcessingClient) -> Engine<FakeProcessingClient> {
        let mut engine = Engine::new(test_settings(), client);
        engine.start();
        engine
    }

    fn frame(original: &str, cartoon: &str) -> StreamEvent {
        StreamEvent::Message(StreamMessage::Frame(Frame::new(
            ImagePayload::new(original),
            ImagePayload::new(cartoon),
        )))
    }

    /// Process channel messages until `done` holds
    async fn process_until(
        engine: &mut Engine<FakeProcessingClient>,
        done: impl Fn(&AppState) -> bool,
    ) {
        while !done(&engine.state) {
            let msg = tokio::time::timeout(Duration::from_secs(60), engine.next_message())
                .await
                .expect("timed out waiting for a message")
                .expect("channel closed");
            engine.process_message(msg);
        }
    }

    async fn wait_for_pending(client: &FakeProcessingClient) {
        while client.pending_count() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn write_file(dir: &TempDir, name: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, b"file bytes").unwrap();
        path.display().to_string()
    }

    fn submit(engine: &mut Engine<FakeProcessingClient>, path: String) {
        engine.process_message(Message::PathInput { text: path });
        engine.process_message(Message::SubmitPath);
    }

    fn job_status(engine: &Engine<FakeProcessingClient>) -> Option<JobStatus> {
        engine.state.modes.upload().map(|s| s.job().status())
    }

    #[tokio::test]
    async fn test_zero_warmup_goes_straight_to_menu() {
        let engine = started_engine(FakeProcessingClient::new());
        assert_eq!(engine.state.mode(), Mode::Start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warmup_delay_then_menu() {
        let mut engine = Engine::new(Settings::default(), FakeProcessingClient::new());
        engine.start();
        assert_eq!(engine.state.mode(), Mode::Booting);

        process_until(&mut engine, |s| s.mode() == Mode::Start).await;
    }

    #[tokio::test]
    async fn test_webcam_frames_toggle_and_back() {
        let client = FakeProcessingClient::new();
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Webcam));
        assert_eq!(client.open_stream_count(), 1);
        let feeder = client.streams().remove(0);

        assert!(feeder.push(StreamEvent::Opened).await);
        assert!(feeder.push(frame("A", "B")).await);
        process_until(&mut engine, |s| {
            s.modes.webcam().and_then(|w| w.latest()).is_some()
        })
        .await;

        let shown = |engine: &Engine<FakeProcessingClient>| {
            let frame = engine.state.modes.webcam().unwrap().latest().unwrap();
            frame.payload(engine.state.modes.display()).as_str().to_string()
        };
        assert_eq!(shown(&engine), "B");
        engine.process_message(Message::Key(InputKey::Char('t')));
        assert_eq!(shown(&engine), "A");

        engine.process_message(Message::Key(InputKey::Esc));
        assert_eq!(engine.state.mode(), Mode::Start);
        assert!(feeder.is_closed());
        assert_eq!(client.open_stream_count(), 0);
    }

    #[tokio::test]
    async fn test_reentering_webcam_opens_fresh_stream() {
        let client = FakeProcessingClient::new();
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Webcam));
        engine.process_message(Message::Back);
        engine.process_message(Message::SelectMode(Mode::Webcam));

        let streams = client.streams();
        assert_eq!(streams.len(), 2);
        assert!(streams[0].is_closed());
        assert!(!streams[1].is_closed());
        assert_eq!(client.open_stream_count(), 1);
    }

    #[tokio::test]
    async fn test_image_upload_round_trip() {
        let dir = TempDir::new().unwrap();
        let client = FakeProcessingClient::replying_with(FakeReply::pair("X", "Y"));
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Image));
        submit(&mut engine, write_file(&dir, "cat.png"));
        process_until(&mut engine, |s| {
            s.modes
                .upload()
                .is_some_and(|u| u.job().status().is_terminal())
        })
        .await;

        assert_eq!(job_status(&engine), Some(JobStatus::Succeeded));
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, MediaKind::Image);
        assert_eq!(calls[0].file_name, "cat.png");
        assert_eq!(calls[0].media_type, "image/png");
        assert_eq!(calls[0].bytes, b"file bytes");
    }

    #[tokio::test]
    async fn test_service_error_fails_job() {
        let dir = TempDir::new().unwrap();
        let client = FakeProcessingClient::replying_with(FakeReply::Service {
            status: 400,
            message: "no face found".to_string(),
        });
        let mut engine = started_engine(client);

        engine.process_message(Message::SelectMode(Mode::Image));
        submit(&mut engine, write_file(&dir, "cat.jpg"));
        process_until(&mut engine, |s| {
            s.modes
                .upload()
                .is_some_and(|u| u.job().status().is_terminal())
        })
        .await;

        let job = engine.state.modes.upload().unwrap().job();
        assert_eq!(job.status(), JobStatus::Failed);
        assert!(job.error().unwrap().contains("no face found"));
    }

    #[tokio::test]
    async fn test_missing_file_fails_job_without_request() {
        let dir = TempDir::new().unwrap();
        let client = FakeProcessingClient::new();
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Image));
        submit(&mut engine, dir.path().join("gone.png").display().to_string());
        process_until(&mut engine, |s| {
            s.modes
                .upload()
                .is_some_and(|u| u.job().status().is_terminal())
        })
        .await;

        assert_eq!(job_status(&engine), Some(JobStatus::Failed));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_file_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let client = FakeProcessingClient::new();
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Image));
        submit(&mut engine, write_file(&dir, "anim.gif"));
        tokio::task::yield_now().await;

        assert_eq!(job_status(&engine), Some(JobStatus::Idle));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_progress_capped_until_response() {
        let dir = TempDir::new().unwrap();
        let client = FakeProcessingClient::new();
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Video));
        submit(&mut engine, write_file(&dir, "clip.mp4"));
        wait_for_pending(&client).await;

        let progress = |engine: &Engine<FakeProcessingClient>| {
            engine.state.modes.upload().unwrap().job().progress().value()
        };
        let mut last = progress(&engine);
        while last < 95 {
            let msg = engine.next_message().await.unwrap();
            assert!(matches!(msg, Message::ProgressTick { .. }));
            engine.process_message(msg);
            let now = progress(&engine);
            assert!(now >= last);
            assert!(now <= 95);
            last = now;
        }

        // Capped: the ticker is stopped and no further ticks arrive
        assert!(!engine.state.modes.upload().unwrap().job().estimator_running());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(engine.msg_rx.try_recv().is_err());
        assert_eq!(progress(&engine), 95);

        assert!(client.complete_next(FakeReply::pair("A", "B")));
        process_until(&mut engine, |s| {
            s.modes
                .upload()
                .is_some_and(|u| u.job().status().is_terminal())
        })
        .await;

        let job = engine.state.modes.upload().unwrap().job();
        assert_eq!(job.status(), JobStatus::Succeeded);
        assert_eq!(job.progress().value(), 100);
        assert!(!job.estimator_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_status_only_reply_succeeds() {
        let dir = TempDir::new().unwrap();
        let client = FakeProcessingClient::new();
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Video));
        submit(&mut engine, write_file(&dir, "clip.mov"));
        wait_for_pending(&client).await;

        assert!(client.complete_next(FakeReply::Success(ProcessingResult::message_only(
            "Video processed successfully"
        ))));
        process_until(&mut engine, |s| {
            s.modes
                .upload()
                .is_some_and(|u| u.job().status().is_terminal())
        })
        .await;

        let job = engine.state.modes.upload().unwrap().job();
        assert_eq!(job.status(), JobStatus::Succeeded);
        assert_eq!(job.progress().value(), 100);
        let result = job.result().unwrap();
        assert!(result.images.is_none());
        assert_eq!(result.message.as_deref(), Some("Video processed successfully"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_stops_ticks_and_discards_result() {
        let dir = TempDir::new().unwrap();
        let client = FakeProcessingClient::new();
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Video));
        submit(&mut engine, write_file(&dir, "clip.mp4"));
        wait_for_pending(&client).await;

        engine.process_message(Message::Back);
        engine.drain_pending_messages();

        // The call is still in flight; its caller is alive but cancelled
        assert!(client.complete_next(FakeReply::pair("A", "B")));
        tokio::time::sleep(Duration::from_secs(5)).await;

        let mut late = Vec::new();
        while let Ok(msg) = engine.msg_rx.try_recv() {
            late.push(msg);
        }
        assert!(late.is_empty(), "unexpected messages: {late:?}");
        assert_eq!(engine.state.mode(), Mode::Start);
    }

    #[tokio::test]
    async fn test_shutdown_closes_active_stream() {
        let client = FakeProcessingClient::new();
        let mut engine = started_engine(client.clone());

        engine.process_message(Message::SelectMode(Mode::Webcam));
        engine.shutdown();
        assert_eq!(client.open_stream_count(), 0);
        assert_eq!(engine.state.mode(), Mode::Start);
    }
}
