//! memberdir binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal state
//! on exit.
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use memberdir::app::config::{BackendKind, Settings};
use memberdir::app::{AppState, Keymap, Theme};
use memberdir::error::Result;
use memberdir::net::NetClient;
use memberdir::{app, error};

#[derive(Parser, Debug)]
#[command(
    name = "memberdir",
    version,
    about = "TUI to browse and manage a remote member directory"
)]
struct Cli {
    /// Settings file in key = value format; created with defaults if absent.
    #[arg(long, default_value = "memberdir.conf")]
    config: String,

    /// Backend kind: "rest" or "collection".
    #[arg(long, env = "MEMBERDIR_BACKEND")]
    backend: Option<String>,

    /// Base URL of the REST backend.
    #[arg(long, env = "MEMBERDIR_BASE_URL")]
    base_url: Option<String>,

    /// Collection URL for the hosted-document backend.
    #[arg(long, env = "MEMBERDIR_COLLECTION_URL")]
    collection_url: Option<String>,

    /// Listing page size for the REST backend.
    #[arg(long)]
    per_page: Option<u32>,

    /// API key sent as the x-api-key header.
    #[arg(long, env = "MEMBERDIR_API_KEY")]
    api_key: Option<String>,

    /// Log file; the terminal itself is taken over by the UI.
    #[arg(long, default_value = "memberdir.log")]
    log_file: String,
}

/// Route tracing output to a file so it never corrupts the UI.
fn init_logging(path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| error::simple_error(format!("open log file {path}: {e}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let mut settings = Settings::load_or_init(&cli.config);
    let backend = match cli.backend.as_deref() {
        Some(s) => Some(BackendKind::parse(s).ok_or_else(|| {
            error::simple_error(format!(
                "unknown backend {s:?} (expected \"rest\" or \"collection\")"
            ))
        })?),
        None => None,
    };
    settings.override_with(
        backend,
        cli.base_url,
        cli.collection_url,
        cli.per_page,
        cli.api_key,
    );
    let source = settings.build_source()?;

    let theme = Theme::load_or_init("theme.conf");
    let keymap = Keymap::load_or_init("keybinds.conf");
    let state = AppState::new(NetClient::spawn(source), theme, keymap);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
