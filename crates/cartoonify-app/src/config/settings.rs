//! Settings loading for config.toml

use std::path::{Path, PathBuf};

use url::Url;

use cartoonify_client::ClientConfig;
use cartoonify_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "cartoonify";

/// Environment variable overriding `service.base_url`
pub const BASE_URL_ENV_VAR: &str = "CARTOONIFY_BASE_URL";

/// Default location of the config file (`<config dir>/cartoonify/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from `config_path`.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Apply `CARTOONIFY_BASE_URL` on top of file settings
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(url) = std::env::var(BASE_URL_ENV_VAR) {
        let url = url.trim();
        if !url.is_empty() {
            debug!("{} overrides base URL: {}", BASE_URL_ENV_VAR, url);
            settings.service.base_url = url.to_string();
        }
    }
}

/// Parse and validate the configured base URL
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::config_invalid(format!("base_url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::config_invalid(format!(
            "base_url '{}': unsupported scheme '{}'",
            raw, other
        ))),
    }
}

/// Build the HTTP client configuration from settings
pub fn client_config(settings: &Settings) -> Result<ClientConfig> {
    let base_url = parse_base_url(&settings.service.base_url)?;
    Ok(ClientConfig::new(base_url)
        .with_request_timeout(settings.service.request_timeout())
        .with_connect_timeout(settings.service.connect_timeout()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Config File Creation
// ─────────────────────────────────────────────────────────────────────────────

/// Write a commented default config file.
///
/// Returns `false` without touching anything if the file already exists.
pub fn init_config_file(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        debug!("Config file already exists at {:?}", config_path);
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {:?}: {}", parent, e)))?;
    }

    std::fs::write(config_path, generate_default_config())
        .map_err(|e| Error::config(format!("Failed to write {:?}: {}", config_path, e)))?;
    info!("Created default config at {:?}", config_path);
    Ok(true)
}

fn generate_default_config() -> String {
    r#"# Cartoonify Configuration

[service]
base_url = "http://localhost:5000"
request_timeout_secs = 0     # Upload time limit (0 = wait for long videos)
connect_timeout_secs = 10

[ui]
warmup_ms = 1500             # Startup screen duration (0 = skip)
enable_video = false         # Offer video upload on the start menu
default_display = "cartoon"  # "cartoon" or "original"

[progress]
tick_ms = 500                # Video progress estimate cadence
step = 5                     # Percentage points per tick (capped at 95)
"#
    .to_string()
}
