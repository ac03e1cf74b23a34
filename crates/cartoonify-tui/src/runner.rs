//! Main TUI runner - entry point and event loop

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use cartoonify_app::config::Settings;
use cartoonify_app::Engine;
use cartoonify_client::ProcessingClient;
use cartoonify_core::prelude::*;

use crate::widgets::PreviewCache;
use crate::{event, render, terminal};

/// Run the TUI against a processing client until the user quits
pub async fn run<C>(settings: Settings, client: C) -> Result<()>
where
    C: ProcessingClient + Clone + Sync + 'static,
{
    terminal::install_panic_hook();

    let mut term = ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))?;
    if let Err(e) = execute!(std::io::stdout(), EnableBracketedPaste) {
        warn!("Bracketed paste unavailable: {}", e);
    }

    let mut engine = Engine::new(settings, client);
    engine.spawn_signal_handler();
    engine.start();
    info!("Cartoonify started");

    let result = run_loop(&mut term, &mut engine);

    // Close the stream / stop tickers of whatever mode was open
    engine.shutdown();

    let _ = execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    result
}

fn run_loop<C>(terminal: &mut ratatui::DefaultTerminal, engine: &mut Engine<C>) -> Result<()>
where
    C: ProcessingClient + Clone + Sync + 'static,
{
    let mut previews = PreviewCache::new();

    while !engine.should_quit() {
        // Results, frames and ticks from background tasks
        engine.drain_pending_messages();

        terminal.draw(|frame| render::view(frame, &engine.state, &mut previews))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }
    Ok(())
}
