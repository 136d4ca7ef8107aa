//! taskmux — terminal console for a remote tmux task server.
//!
//! Responsibilities:
//! - Orchestrate startup: env, logging, settings, client, initial route.
//! - Run the main event loop.
//!
//! Does NOT handle:
//! - REST API calls (see `crates/client`).
//! - Settings/shortcut persistence (see `crates/config`).
//!
//! Invariants:
//! - The embedded-wrapper context is probed once at startup and never
//!   re-evaluated mid-session.
//! - Host/port flags override the live client only; they are not written
//!   to the settings store.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use taskmux_client::{TaskmuxClient, shared_settings};
use taskmux_config::FileSettings;
use taskmux_config::constants::DEFAULT_UI_TICK_MS;
use taskmux_config::server::{self, ServerAddress};

use taskmux_tui::app::App;
use taskmux_tui::event::Event;
use taskmux_tui::runtime::{TerminalGuard, init_logging, spawn_event_listener};
use taskmux_tui::{Action, ui};

#[derive(Parser)]
#[command(name = "taskmux")]
#[command(about = "Terminal console for a remote tmux task server", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory for log files
    #[arg(long, default_value = "logs", env = "TASKMUX_LOG_DIR")]
    log_dir: PathBuf,

    /// Override the server host for this session
    #[arg(long, env = "TASKMUX_HOST")]
    host: Option<String>,

    /// Override the server port for this session
    #[arg(long, env = "TASKMUX_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env support for development setups.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _log_guard = init_logging(&cli.log_dir)?;

    // One-shot environment probe; the wrapper context never changes
    // mid-session.
    let embedded = server::is_embedded();

    let settings = shared_settings(FileSettings::open()?);
    let mut client = TaskmuxClient::from_settings(settings.clone())?;

    if cli.host.is_some() || cli.port.is_some() {
        let stored = {
            let guard = settings.lock().unwrap_or_else(|e| e.into_inner());
            server::load(&*guard)
        };
        client.set_server_address(&ServerAddress {
            host: cli.host.clone().or(stored.host),
            port: cli.port.or(stored.port),
        });
    }

    tracing::info!(base_url = %client.base_url(), embedded, "Starting taskmux");

    let mut app = App::new(settings, embedded);

    let mut guard = TerminalGuard::enter()?;
    let mut events = spawn_event_listener(Duration::from_millis(DEFAULT_UI_TICK_MS));

    // Populate whatever screen the guard picked for startup.
    app.dispatch(Action::Refresh, &mut client).await;

    loop {
        guard.terminal.draw(|frame| ui::render(frame, &app))?;

        match events.recv().await {
            Some(Event::Input(key)) => {
                if let Some(action) = app.handle_key(key) {
                    app.dispatch(action, &mut client).await;
                }
            }
            Some(Event::Tick) => app.on_tick(),
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
