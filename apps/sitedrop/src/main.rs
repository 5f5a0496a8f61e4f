//! sitedrop — terminal client for deploying static site folders.

mod adapter;
mod app;
mod clipboard;
mod config;
mod notice;
mod views;

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use app::App;

fn main() -> Result<()> {
    init_logging();

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("sitedrop requires an interactive terminal (TTY)");
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let config = config::AppConfig::load()?;
    let client =
        Arc::new(sitedrop_hosting::Client::new().context("failed to build HTTP client")?);
    let initial_folder = std::env::args().nth(1);

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut app = App::new(config, client, runtime.handle().clone(), initial_folder);
    let res = run_loop(&mut terminal, &mut app);

    // Teardown cancels any in-flight deploy and persists the config.
    app.shutdown();

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.drain_messages();
        app.notices.prune_expired();

        terminal.draw(|f| views::draw(f, app)).context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(100)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => app.handle_key(k),
                _ => {}
            }
        }
    }
}

/// Logs go to a file — the terminal belongs to the TUI.
fn init_logging() {
    let Ok(dir) = config::config_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("sitedrop.log")) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sitedrop=debug")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
