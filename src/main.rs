use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{ffi::OsStr, io, path::Path};
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod dates;
mod error;
mod records;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = config::Cli::parse();

    // Logs go to a file: stdout belongs to the TUI.
    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let log_name = cli
        .log_file
        .file_name()
        .unwrap_or_else(|| OsStr::new("mpsi-tracker.log"));
    let (writer, _guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_name));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let credentials = auth::Credentials::load(&cli.users_file);
    let mut app = app::App::new(credentials, cli.data_file.clone());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("{err:?}");
    }
    Ok(())
}
