//! studyaid - AI study aids in the terminal
//!
//! Starts the interactive TUI, or runs a single headless subcommand.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use studyaid::app::App;
use studyaid::cli::{Cli, StartupConfig};
use studyaid::commands;
use studyaid::config::AppConfig;
use studyaid::data::GenerationClient;
use studyaid::fallback::FallbackController;
use studyaid::logging;
use studyaid::ui;
use studyaid::worker::GenerationWorker;

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

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    if let Some(command) = &cli.command {
        logging::init(&config.logging)?;
        let controller = controller(&config);
        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr().lock();
        commands::run(command, &controller, &config.export_dir, &mut stdout, &mut stderr).await?;
        return Ok(());
    }

    // Validate startup arguments before taking over the terminal
    let startup = StartupConfig::from_cli(&cli)?;
    logging::init(&config.tui_logging())?;
    info!(backend = %config.backend_url, "Starting TUI");

    run_tui(App::with_startup_config(
        GenerationWorker::new(controller(&config)),
        config.export_dir.clone(),
        startup,
    ))
}

fn controller(config: &AppConfig) -> FallbackController {
    FallbackController::new(
        GenerationClient::new(config.backend_url.clone()),
        config.open_cache(),
    )
}

fn run_tui(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        // Apply any finished generations
        app.process_messages();

        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    info!("TUI closed");

    Ok(())
}
