use std::sync::Arc;

use clap::Args;
use storefront_app::{
    context::AppContext,
    search::{FacetParams, FacetSearchError, FacetedSearch, SubmitOutcome},
};
use tracing::{info, warn};

use crate::{commands::CliError, config::catalog::CatalogArgs, terminal::TerminalPage};

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Category page path, e.g. `/shoes/`
    path: String,

    /// Facet selection as `facet=value`; repeatable
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// Sort order
    #[arg(long)]
    sort: Option<String>,

    /// Listing page
    #[arg(long)]
    page: Option<u32>,

    /// Minimum price
    #[arg(long)]
    price_min: Option<String>,

    /// Maximum price
    #[arg(long)]
    price_max: Option<String>,

    /// Show every option of this facet instead of searching
    #[arg(long, value_name = "FACET")]
    show_more: Option<String>,

    #[command(flatten)]
    catalog: CatalogArgs,
}

impl SearchArgs {
    fn params(&self) -> FacetParams {
        let mut params = self
            .filters
            .iter()
            .fold(FacetParams::new(&self.path), |params, (facet, value)| {
                params.with_filter(facet, value)
            });

        if let Some(sort) = &self.sort {
            params = params.with_sort(sort);
        }

        if let Some(page) = self.page {
            params = params.with_page(page);
        }

        if self.price_min.is_some() || self.price_max.is_some() {
            params = params.with_price(
                self.price_min.clone().unwrap_or_default(),
                self.price_max.clone().unwrap_or_default(),
            );
        }

        params
    }
}

pub(crate) async fn run(args: SearchArgs, context: AppContext) -> Result<(), CliError> {
    let search = FacetedSearch::new(
        context.search,
        Arc::new(TerminalPage::stdout()),
        args.catalog.settings()?,
    );

    if let Some(facet) = &args.show_more {
        search.show_more(&args.path, facet).await?;

        return Ok(());
    }

    match search.submit_facet_change(&args.params()).await {
        Ok(SubmitOutcome::Applied(_)) => info!("rendered results for {}", args.path),
        Ok(SubmitOutcome::Superseded(token)) => info!("search {token} was superseded"),
        Err(FacetSearchError::Validation(failure)) => {
            for (field, message) in &failure.messages {
                warn!("{field} price: {message}");
            }

            return Err(FacetSearchError::Validation(failure).into());
        }
        Err(error) => return Err(error.into()),
    }

    Ok(())
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((facet, value)) if !facet.trim().is_empty() => {
            Ok((facet.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected facet=value, got `{raw}`")),
    }
}
