//! TechSolutions admin console
//!
//! Command-line front end for the service catalog, the login gate and the
//! contract request log.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod display;
mod error;
mod shell;
mod state;

fn main() {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = cli::Cli::parse();
    tracing::debug!("Starting TechSolutions admin");

    let app_state = match state::AppState::new(cli.data_dir, cli.config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(data_dir = %app_state.data_dir().display(), "Data directory");

    if let Err(e) = commands::run(&app_state, cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
