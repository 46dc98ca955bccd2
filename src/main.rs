//! # Hearing UI Entry Point
//!
//! This is the main entry point for the hearing test terminal UI.
//!
//! ## Overview
//!
//! The binary opens the test window and binds it to the walkthrough engine,
//! which stands in for the audio test engine so every screen can be driven
//! from the keyboard.
//!
//! ## Usage
//!
//! ```bash
//! # Use the default configuration
//! hearing-ui
//!
//! # Use a specific configuration file
//! hearing-ui --config ./hearing-ui.json
//!
//! # Prompt to continue every 3 trials, log to a chosen file
//! hearing-ui --trials 3 --log-file /tmp/hearing-ui.log
//!
//! # Keep those overrides for next time
//! hearing-ui --trials 3 --save-config
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: JSON file, overridden by command-line flags
//! 2. **Logging**: `tracing` to a log file, never to the terminal
//! 3. **Binding**: the engine receives every screen's contract once
//! 4. **Main loop**: apply queued writes, render if needed, handle one event
//!
//! ## Key Bindings
//!
//! - `Tab` / `Down` - Next control
//! - `Shift+Tab` / `Up` - Previous control
//! - `Enter` - Press the focused button, or the screen's default button
//! - `Space` - Press the focused button or flip a toggle
//! - `Left` / `Right` - Change a picker's selection
//! - `Ctrl+C` / `Ctrl+Q` - Quit

use hearing_ui::engine::{bind_engine, DemoEngine};
use hearing_ui::logging;
use hearing_ui::ui;
use hearing_ui::ui::config::Config;
use hearing_ui::ui::App;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// Hearing UI - terminal front end for a speech-in-noise hearing test
#[derive(Parser, Debug)]
#[command(name = "hearing-ui")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a speech-in-noise hearing test from the terminal", long_about = None)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Milliseconds to wait for input before refreshing
    #[arg(long, value_name = "MS")]
    tick_rate: Option<u64>,

    /// Write logs to this file instead of the data directory
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Trials between continue-testing prompts
    #[arg(long, value_name = "N")]
    trials: Option<u32>,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,
}

impl Args {
    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_path(),
        }
    }

    /// Load the configuration file and apply command-line overrides,
    /// saving the result when `--save-config` is given.
    fn into_config(self) -> Result<Config> {
        let path = self.config_path()?;
        let mut config = Config::load_from(&path)?;
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate_ms = tick_rate;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file);
        }
        if let Some(trials) = self.trials {
            config.trials_per_block = trials;
        }
        if self.save_config {
            config.save_to(&path)?;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Try to restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        // Call the original panic hook
        original_hook(panic_info);
    }));

    // Run the application and ensure cleanup happens
    let result = run_application(args).await;

    // Restore panic hook
    let _ = panic::take_hook();

    result
}

async fn run_application(args: Args) -> Result<()> {
    let config = args.into_config()?;
    let log_path = logging::init(&config)?;
    tracing::debug!(?config, "configuration loaded");

    // The window and everything in it belong to this thread
    let mut app = App::new();
    let engine = DemoEngine::new(&config);
    bind_engine(&engine, app.screens());

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the app and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(&mut terminal, &mut app, &mut event_reader, config.tick_rate());

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    tracing::info!(
        trials = engine.trials_completed(),
        log = %log_path.display(),
        "session closed"
    );

    // Return the first error that occurred, or Ok if both succeeded
    run_result?;
    cleanup_result?;

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

/// Apply writes, draw if anything changed, then wait for one event.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_reader: &mut dyn EventReader,
    tick_rate: Duration,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        if app.frame() {
            terminal
                .draw(|f| ui::render(f, app))
                .context("Failed to draw terminal UI")?;
        }

        if app.should_quit {
            return Ok(());
        }

        match event_reader.read_event(tick_rate)? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Some(Event::Resize(_, _)) => app.request_redraw(),
            _ => {}
        }
    }
}
