/// GhostMarket terminal dashboard
///
/// Fetches `/api/state` for the selected ticker and renders the vibe feed, the
/// price trend and the hype alert banner. Logs go to a file so they never
/// tear the alternate screen.
mod app;
mod ui;

use std::{
    error::Error,
    fs::OpenOptions,
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use app::{App, Command};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ghostmarket::{ApiConfig, HttpStateSource, ViewStateController};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Get log file path from GHOSTMARKET_LOG_FILE env var (default: ghostmarket-tui.log)
fn get_log_file() -> String {
    std::env::var("GHOSTMARKET_LOG_FILE").unwrap_or_else(|_| "ghostmarket-tui.log".to_string())
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_file())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;

    let config = ApiConfig::from_env()?;
    info!(
        api_base = %config.api_base,
        ticker = %config.initial_ticker,
        poll_interval = ?config.poll_interval,
        "starting ghostmarket-tui"
    );

    let source = Arc::new(HttpStateSource::new(&config)?);
    let mut controller = ViewStateController::new(source);
    controller.set_ticker(config.initial_ticker.clone());
    let mut app = App::new(controller, config.poll_interval);

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("ghostmarket-tui stopped");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let tick_rate = Duration::from_millis(200);

    loop {
        app.apply_updates();
        terminal.draw(|f| ui::render_ui(f, app.controller.view(), &app.top_bar()))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = Command::from_key(key.code) {
                        if !app.handle(command) {
                            break;
                        }
                    }
                }
            }
        }

        app.on_tick();
    }

    Ok(())
}
