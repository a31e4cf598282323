use std::io;

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use swipewall_core::{AppConfig, Engine};
use swipewall_tui::{event::EventHandler, virtual_size, App, TerminalSurface};

/// Input poll timeout; rendering runs on its own loop
const INPUT_TICK_MS: u64 = 50;

pub async fn run(config: &AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("swipewall"))?;

    let result = run_engine(config).await;

    // Restore terminal even when the engine failed
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)?;

    result
}

async fn run_engine(config: &AppConfig) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let (width, height) = virtual_size(cols, rows);

    let backend = CrosstermBackend::new(io::stdout());
    let engine = Engine::create(config, TerminalSurface::new(Terminal::new(backend)?));
    engine.on_surface_changed(width, height);
    engine.on_visibility_changed(true);
    info!(cols, rows, "Terminal host started");

    let events = EventHandler::new(INPUT_TICK_MS);
    let mut app = App::new();
    // Input polling blocks the thread
    let input = tokio::task::block_in_place(|| app.run(&engine, &events));

    engine.destroy().await?;
    input
}
