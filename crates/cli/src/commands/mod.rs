//! Subcommands and their shared error type.

use std::{io, path::PathBuf};

use clap::Subcommand;
use storefront_app::{
    carts::CartSyncError,
    context::{AppContext, AppInitError},
    page::PageError,
    search::{FacetRequestError, FacetSearchError},
};
use thiserror::Error;

use crate::config::storefront::StorefrontArgs;

mod cart;
mod search;
mod sort;

/// Errors surfaced by a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to initialise storefront clients: {0}")]
    Init(#[from] AppInitError),

    #[error("cart action failed: {0}")]
    Cart(#[from] CartSyncError),

    #[error("search failed: {0}")]
    Search(#[from] FacetSearchError),

    #[error("show more failed: {0}")]
    ShowMore(#[from] FacetRequestError),

    #[error("sort failed: {0}")]
    Sort(#[from] PageError),

    #[error("failed to read messages from {}: {source}", path.display())]
    Messages {
        path: PathBuf,

        #[source]
        source: io::Error,
    },

    #[error("messages dictionary is not a JSON object of strings: {0}")]
    MessagesFormat(#[from] serde_json::Error),
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Cart actions
    Cart(cart::CartCommand),

    /// Run a faceted search against a category page
    Search(search::SearchArgs),

    /// Submit a sort order for a page location
    Sort(sort::SortArgs),
}

impl Commands {
    pub(crate) async fn run(self, storefront: &StorefrontArgs) -> Result<(), CliError> {
        let context = AppContext::from_config(&storefront.http_config())?;

        match self {
            Self::Cart(command) => cart::run(command, context).await,
            Self::Search(args) => search::run(args, context).await,
            Self::Sort(args) => sort::run(args, context).await,
        }
    }
}
