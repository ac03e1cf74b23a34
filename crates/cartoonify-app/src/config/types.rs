//! Configuration types for Cartoonify

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cartoonify_core::DisplayVariant;

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub progress: ProgressSettings,
}

/// Processing service connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceSettings {
    /// Base URL of the processing service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total time allowed for one upload (0 = no limit).
    ///
    /// Unlimited by default: a video reply only arrives once the whole clip
    /// has been processed.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ServiceSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

fn default_base_url() -> String {
    cartoonify_client::DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    0
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Duration of the startup screen before the mode menu appears
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,

    /// Offer video upload on the start menu
    #[serde(default)]
    pub enable_video: bool,

    /// Variant shown first when a result arrives
    #[serde(default)]
    pub default_display: DisplayVariant,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            warmup_ms: default_warmup_ms(),
            enable_video: false,
            default_display: DisplayVariant::default(),
        }
    }
}

impl UiSettings {
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }
}

fn default_warmup_ms() -> u64 {
    1500
}

/// Synthetic video progress settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProgressSettings {
    /// Interval between estimate increments
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Percentage points added per tick
    #[serde(default = "default_step")]
    pub step: u8,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            step: default_step(),
        }
    }
}

/// Minimum estimator cadence to keep the message loop quiet
pub const MIN_TICK_MS: u64 = 50;

impl ProgressSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(MIN_TICK_MS))
    }

    pub fn step(&self) -> u8 {
        self.step.max(1)
    }
}

fn default_tick_ms() -> u64 {
    500
}

fn default_step() -> u8 {
    5
}
