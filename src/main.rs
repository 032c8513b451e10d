mod app;
mod cache;
mod config;
mod data;
mod render;
mod ui;

use app::App;
use color_eyre::config::HookBuilder;
use color_eyre::eyre::WrapErr;
use config::{config_path, load_config, AppConfig};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use data::{spawn_fetch_worker, FetchReport, PriceClient};
use futures_util::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::OpenOptions;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::{Receiver, UnboundedSender};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type Tui = Terminal<CrosstermBackend<Stdout>>;

const WINDOW_TITLE: &str = "Bitcoin Price Chart";

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    install_hooks()?;

    let config = load_config(&config_path());
    init_logging(&config);
    info!(?config, "starting btcchart");

    let client = PriceClient::new(&config.api_base, &config.coin, &config.vs_currency);
    let (requests, reports, worker) = spawn_fetch_worker(client);

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &config, requests, reports).await;
    let restored = restore_terminal();
    worker.abort();
    exit_status(result, restored)
}

/// A loop error is reported ahead of a failed terminal restore.
fn exit_status(
    result: color_eyre::Result<()>,
    restored: io::Result<()>,
) -> color_eyre::Result<()> {
    match &result {
        Ok(()) => info!("exited normally"),
        Err(e) => error!(error = ?e, "exited with error"),
    }
    if let Err(e) = &restored {
        error!(error = %e, "failed to restore terminal");
    }
    result?;
    restored.wrap_err("failed to restore terminal")
}

/// The terminal is restored before a panic report is printed.
fn install_hooks() -> color_eyre::Result<()> {
    let (panic_hook, eyre_hook) = HookBuilder::default().into_hooks();
    eyre_hook.install()?;
    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        panic_hook(info);
    }));
    Ok(())
}

/// Logs go to a file since the terminal is the display.
fn init_logging(config: &AppConfig) {
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "warning: cannot open log file {}: {}; continuing without logs",
                config.log_file.display(),
                e
            );
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("btcchart=debug,info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
}

fn setup_terminal() -> color_eyre::Result<Tui> {
    enable_raw_mode()?;
    match enter_screen() {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = restore_terminal();
            Err(e.into())
        }
    }
}

fn enter_screen() -> io::Result<Tui> {
    let mut stdout = io::stdout();
    write_enter_screen(&mut stdout)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn write_enter_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, EnterAlternateScreen, EnableMouseCapture, SetTitle(WINDOW_TITLE))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)
}

async fn run(
    terminal: &mut Tui,
    config: &AppConfig,
    requests: UnboundedSender<ui::Timeframe>,
    mut reports: Receiver<FetchReport>,
) -> color_eyre::Result<()> {
    let (columns, rows) = crossterm::terminal::size()?;
    let mut app = App::new(config, columns, rows, requests)?;

    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.frame_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while app.is_running() {
        let wake = tokio::select! {
            _ = ticker.tick() => Wake::Tick,
            Some(report) = reports.recv() => Wake::Report(report),
            event = events.next() => match event {
                Some(Ok(event)) => Wake::Input(event),
                Some(Err(e)) => return Err(e).wrap_err("failed to read terminal event"),
                None => break,
            },
        };
        step(terminal, &mut app, wake)?;
    }

    Ok(())
}

enum Wake {
    Tick,
    Report(FetchReport),
    Input(Event),
}

/// Input and fetch reports only update state; the screen is redrawn on frame
/// ticks alone. Returns whether a frame was drawn.
fn step<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    wake: Wake,
) -> color_eyre::Result<bool> {
    match wake {
        Wake::Tick => {
            terminal.draw(|frame| ui::draw(frame, app))?;
            return Ok(true);
        }
        Wake::Report(report) => app.on_fetch(report)?,
        Wake::Input(event) => app.handle_event(event)?,
    }
    Ok(false)
}
