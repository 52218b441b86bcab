//! skygaze - Night-sky observation conditions in the terminal
//!
//! A terminal UI application that shows, for a chosen place, how usable the
//! coming night is for sky observation: cloud cover, seeing, wind, humidity
//! and the dark window between dusk and dawn.

mod app;
mod astro;
mod cache;
mod cli;
mod data;
mod night;
mod refresh;
mod seeing;
mod service;
mod ui;

use std::io;
use std::panic;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use app::{App, AppState};
use cli::{Cli, StartupConfig};
use refresh::{RefreshConfig, RefreshHandle};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Initializes tracing to stderr, gated by RUST_LOG
///
/// With RUST_LOG unset nothing is emitted, so the alternate screen stays
/// clean; redirect stderr to a file to capture logs while the TUI runs.
fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match app.state {
        AppState::Search => ui::render_search(frame, app),
        AppState::Loading => ui::render_loading(frame, app),
        AppState::Outlook => ui::render_outlook(frame, app),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let cli = Cli::parse();
    let config = StartupConfig::from_cli(&cli)?;

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let refresh_config = RefreshConfig {
        enabled: config.auto_refresh,
        ..RefreshConfig::default()
    };
    let mut refresh_handle = RefreshHandle::spawn(refresh_config);

    // Create app instance; a saved place or a CLI query kicks off right away
    let mut app = App::with_startup_config(config);

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Fire the place search once its debounce deadline passed
        if let Some(query) = app.take_due_search(Instant::now()) {
            app.run_search(&query).await;
        }

        // Background ticker prompting periodic reloads
        if let Some(message) = refresh::try_recv(&mut refresh_handle) {
            app.handle_refresh_message(message);
        }

        if app.take_refresh_request() {
            // Show the loading state before the await
            terminal.draw(|f| render_ui(f, &app))?;
            app.reload().await;
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    refresh_handle.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
