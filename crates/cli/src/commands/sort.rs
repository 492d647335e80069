use std::sync::Arc;

use clap::Args;
use storefront_app::{
    carts::{CartSettings, CartSyncController},
    context::AppContext,
    page::{CategoryPage, SortOutcome},
    search::FacetedSearch,
};
use tracing::info;

use crate::{commands::CliError, config::catalog::CatalogArgs, terminal::TerminalPage};

#[derive(Debug, Args)]
pub(crate) struct SortArgs {
    /// Current page location, e.g. `/shoes/?brand=Acme&page=2`
    location: String,

    /// Sort order to apply
    sort: String,

    /// The page has no faceted search; navigate instead of searching in place
    #[arg(long)]
    no_faceted_search: bool,

    #[command(flatten)]
    catalog: CatalogArgs,
}

pub(crate) async fn run(args: SortArgs, context: AppContext) -> Result<(), CliError> {
    let terminal = Arc::new(TerminalPage::stdout());

    let search = if args.no_faceted_search {
        None
    } else {
        Some(FacetedSearch::new(
            context.search,
            terminal.clone(),
            args.catalog.settings()?,
        ))
    };

    let carts = CartSyncController::new(context.carts, terminal, CartSettings::default());
    let page = CategoryPage::new(carts, search);

    match page.on_sort_submitted(&args.location, &args.sort).await? {
        SortOutcome::Searched(outcome) => info!("sorted in place: {outcome:?}"),
        SortOutcome::Navigated(location) => info!("navigated to {location}"),
    }

    Ok(())
}
