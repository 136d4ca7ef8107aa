//! taskmux-cli — headless access to a taskmux server.
//!
//! Responsibilities:
//! - Parse arguments, initialize logging to stderr, run the command.
//!
//! Does NOT handle:
//! - Interactive use (see `crates/tui`).

mod args;
mod dispatch;
mod formatters;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // .env support for development setups.
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dispatch::run(cli).await
}
