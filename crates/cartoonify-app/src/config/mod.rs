//! Configuration file parsing for Cartoonify
//!
//! Settings come from `config.toml` in the user config directory (or an
//! explicit path), then `CARTOONIFY_BASE_URL`, then command-line flags.

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, client_config, default_config_path, init_config_file, load_settings,
    parse_base_url, BASE_URL_ENV_VAR,
};
pub use types::*;
