//! Storefront CLI

use std::process;

use tracing::error;

use crate::config::CliConfig;

mod commands;
mod config;
mod observability;
mod terminal;

/// Storefront CLI entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = CliConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(init_error) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{init_error}");
        }

        process::exit(1);
    }

    if let Err(run_error) = config.command.run(&config.storefront).await {
        error!("{run_error}");

        process::exit(1);
    }
}
