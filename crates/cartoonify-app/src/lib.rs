//! cartoonify-app - Application state and orchestration for Cartoonify
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: the mode state machine, the live frame session, upload jobs
//! with their progress estimator, configuration loading, and the Engine that
//! wires background tasks to the update loop.

pub mod actions;
pub mod config;
pub mod engine;
pub mod frame_session;
pub mod handler;
pub mod input_key;
pub mod job;
pub mod message;
pub mod mode;
pub mod process;
pub mod signals;
pub mod state;
pub mod upload;

// Re-export primary types
pub use engine::Engine;
pub use frame_session::{FrameStreamSession, StreamView};
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use job::{EstimatorHandle, JobId, ProcessingJob};
pub use message::Message;
pub use mode::{ActivationId, ModeController};
pub use state::{AppState, StartMenu};
pub use upload::UploadScreen;
