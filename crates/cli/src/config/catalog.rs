//! Catalog Config

use std::{fs, path::PathBuf, time::Duration};

use clap::Args;
use rustc_hash::FxHashMap;
use storefront_app::search::{
    FacetRequestConfig, FacetedSearchSettings, ValidationMessages, config::DEFAULT_PRODUCTS_PER_PAGE,
};

use crate::commands::CliError;

/// Faceted search settings.
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Products per listing page
    #[arg(long, env = "STOREFRONT_PRODUCTS_PER_PAGE", default_value_t = DEFAULT_PRODUCTS_PER_PAGE)]
    pub products_per_page: u32,

    /// Scroll reset animation duration in milliseconds
    #[arg(long, default_value_t = 100u64)]
    pub scroll_ms: u64,

    /// JSON translation dictionary for price validation messages
    #[arg(long, env = "STOREFRONT_MESSAGES")]
    pub messages: Option<PathBuf>,
}

impl CatalogArgs {
    /// Pipeline settings, reading the message dictionary when one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the dictionary cannot be read or is not a flat
    /// JSON object of strings.
    pub fn settings(&self) -> Result<FacetedSearchSettings, CliError> {
        let messages = match &self.messages {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| CliError::Messages {
                    path: path.clone(),
                    source,
                })?;

                let dictionary: FxHashMap<String, String> = serde_json::from_str(&raw)?;

                ValidationMessages::from_dictionary(&dictionary)
            }
            None => ValidationMessages::default(),
        };

        Ok(FacetedSearchSettings {
            request: FacetRequestConfig::category(self.products_per_page),
            messages,
            scroll_duration: Duration::from_millis(self.scroll_ms),
        })
    }
}
