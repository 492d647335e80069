//! CLI configuration module

use clap::Parser;

use crate::{
    commands::Commands,
    config::{logging::LoggingConfig, storefront::StorefrontArgs},
};

pub(crate) mod cart;
pub(crate) mod catalog;
pub(crate) mod logging;
pub(crate) mod storefront;

/// Storefront CLI configuration
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart and faceted search driver", long_about = None)]
pub struct CliConfig {
    /// Storefront origin settings.
    #[command(flatten)]
    pub storefront: StorefrontArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Action to run against the storefront.
    #[command(subcommand)]
    pub command: Commands,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
