//! Terminal lifecycle, logging and the event feed.
//!
//! Responsibilities:
//! - Enter/leave raw mode and the alternate screen (restored on drop, so
//!   a panic doesn't leave the terminal unusable).
//! - Initialize file-based logging (stdout belongs to the TUI).
//! - Feed input and tick events to the main loop.

use std::io::Stdout;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::event::Event;

/// Capacity of the event channel between the input thread and the UI loop.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Owns the terminal; restores it when dropped.
pub struct TerminalGuard {
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}

/// Initializes daily-rolling file logging under `log_dir`.
///
/// The returned guard must live for the whole program so buffered log
/// lines are flushed on exit.
pub fn init_logging(log_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "taskmux.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

/// Spawns the input thread feeding key events and ticks to the UI loop.
pub fn spawn_event_listener(tick: Duration) -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    std::thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick.saturating_sub(last_tick.elapsed());
            if crossterm::event::poll(timeout).unwrap_or(false)
                && let Ok(CrosstermEvent::Key(key)) = crossterm::event::read()
                && tx.blocking_send(Event::Input(key)).is_err()
            {
                break;
            }
            if last_tick.elapsed() >= tick {
                if tx.blocking_send(Event::Tick).is_err() {
                    break;
                }
                last_tick = Instant::now();
            }
        }
    });

    rx
}
