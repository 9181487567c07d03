//! ARKIVA TUI entry point.

use arkiva_core::SystemClock;
use arkiva_llm::ArkivaBackend;
use arkiva_tui::config::TuiConfig;
use arkiva_tui::error::TuiError;
use arkiva_tui::events::TuiEvent;
use arkiva_tui::host::PanelHost;
use arkiva_tui::keys::map_key;
use arkiva_tui::state::App;
use arkiva_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    init_logging(&config.error_log_path)?;

    let backend = Arc::new(ArkivaBackend::new(&config.backend_config())?);
    let host = PanelHost::new(
        config.summary.policy(),
        config.summary.timing(),
        backend.clone(),
        backend,
        Arc::new(SystemClock),
    );
    let mut app = App::new(config, host);
    tracing::info!(documents = app.documents.len(), "arkiva-tui started");

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (input_tx, mut input_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(input_tx);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            Some(event) = input_rx.recv() => {
                if handle_event(&mut app, event) {
                    break;
                }
            }
            Some(event) = app.host.next_event() => {
                app.host.handle_event(event);
            }
        }
    }

    let stats = app.host.stats();
    tracing::info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        "arkiva-tui exiting"
    );
    Ok(())
}

fn init_logging(path: &Path) -> Result<(), TuiError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

fn handle_event(app: &mut App, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Input(key) => match map_key(key) {
            Some(action) => app.apply(action),
            None => false,
        },
        TuiEvent::Resize { .. } => false,
    }
}
