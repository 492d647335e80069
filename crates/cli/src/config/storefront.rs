//! Storefront Config

use std::time::Duration;

use clap::Args;
use storefront_app::http::StorefrontHttpConfig;

/// Storefront origin settings.
#[derive(Debug, Args)]
pub struct StorefrontArgs {
    /// Storefront origin, e.g. `https://store.example.com`
    #[arg(long, env = "STOREFRONT_URL")]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "STOREFRONT_TIMEOUT_SECONDS",
        default_value_t = 10u64
    )]
    pub timeout_seconds: u64,
}

impl StorefrontArgs {
    /// HTTP settings for the library clients.
    #[must_use]
    pub fn http_config(&self) -> StorefrontHttpConfig {
        StorefrontHttpConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}
