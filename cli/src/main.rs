//! Latchkey CLI - binary entry point and terminal session management.
//!
//! ```text
//! main() -> Settings::load() -> services -> TerminalSession::new() -> run_app()
//! ```
//!
//! # Event Loop
//!
//! A fixed 16ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`latchkey_tui::InputPump`])
//! 3. Apply finished session work (`app.tick()`)
//! 4. Render frame

use std::{
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use latchkey_client::{AuthClient, ClientOptions};
use latchkey_config::{Settings, StorageLocation, latchkey_dir};
use latchkey_core::{SessionService, ThemeService};
use latchkey_store::{CredentialStore, FileStore, MemoryStore};
use latchkey_tui::{App, InputPump, draw, handle_events};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than write over the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let primary = latchkey_dir().join("logs").join("latchkey.log");
    let fallback = PathBuf::from(".latchkey").join("logs").join("latchkey.log");
    if primary == fallback {
        vec![primary]
    } else {
        vec![primary, fallback]
    }
}

fn open_store(location: &StorageLocation) -> Result<Arc<dyn CredentialStore>> {
    match location {
        StorageLocation::Directory(dir) => {
            let store = FileStore::open(dir.clone())
                .with_context(|| format!("opening credential store at {}", dir.display()))?;
            tracing::info!(dir = %store.dir().display(), "Using file credential store");
            Ok(Arc::new(store))
        }
        StorageLocation::Ephemeral => {
            tracing::info!("Using in-memory credential store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, bracketed paste and the alternate screen are restored even after
/// panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnableBracketedPaste, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::load().context("loading configuration")?;
    tracing::info!(base_url = %settings.api_base_url, "Configuration loaded");

    let client = AuthClient::new(
        settings.api_base_url.clone(),
        &ClientOptions {
            timeout: settings.request_timeout,
            connect_timeout: settings.connect_timeout,
        },
    )?;
    let store = open_store(&settings.storage)?;
    let sessions = Arc::new(SessionService::new(client, store));
    let themes = Arc::new(ThemeService::default());

    let mut app = App::new(sessions, themes, settings.ui);
    app.start_bootstrap();

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    if let Err(err) = &result {
        tracing::error!("Exiting with error: {err:?}");
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(app, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
