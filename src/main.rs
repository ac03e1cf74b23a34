//! Cartoonify - terminal client for the Cartoonify processing service
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;
use cartoonify_app::config::{
    apply_env_overrides, client_config, default_config_path, init_config_file, load_settings,
};
use cartoonify_client::HttpProcessingClient;
use color_eyre::Result;
use tracing::{error, info};

/// Cartoonify - live webcam and file cartoonification in the terminal
#[derive(Parser, Debug)]
#[command(name = "cartoonify")]
#[command(about = "Terminal client for the Cartoonify service", long_about = None)]
struct Args {
    /// Base URL of the processing service (overrides config and environment)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Path to config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip the warm-up screen
    #[arg(long)]
    no_warmup: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .or_else(default_config_path)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    if args.init_config {
        if init_config_file(&config_path)? {
            eprintln!("Created {}", config_path.display());
        } else {
            eprintln!("Config already exists: {}", config_path.display());
        }
        return Ok(());
    }

    color_eyre::install()?;
    cartoonify_core::logging::init()?;

    let mut settings = load_settings(&config_path);
    apply_env_overrides(&mut settings);
    if let Some(url) = args.base_url {
        settings.service.base_url = url;
    }
    if args.no_warmup {
        settings.ui.warmup_ms = 0;
    }

    // Reject a bad base URL before the terminal is taken over
    let client = match client_config(&settings).and_then(HttpProcessingClient::new) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    };

    info!("Service: {}", settings.service.base_url);

    let result = cartoonify_tui::run(settings, client).await;
    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("Cartoonify exiting");
    Ok(result?)
}
