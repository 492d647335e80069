//! Category page controller.

use thiserror::Error;
use tracing::debug;

use crate::{
    carts::{CartSyncController, CartSyncError},
    search::{
        FacetParams, FacetSearchError, FacetedSearch, SubmitOutcome,
        params::{LocationError, sort_by_location},
    },
};

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Search(#[from] FacetSearchError),
}

/// What a sort submission resulted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// Handled in place by the faceted search pipeline.
    Searched(SubmitOutcome),

    /// No faceted search on this page; navigated to this location.
    Navigated(String),
}

/// Wires the cart controller and, when the page has one, the faceted search.
///
/// Navigation goes through the cart controller's view.
#[derive(Debug)]
pub struct CategoryPage {
    carts: CartSyncController,
    search: Option<FacetedSearch>,
}

impl CategoryPage {
    #[must_use]
    pub fn new(carts: CartSyncController, search: Option<FacetedSearch>) -> Self {
        Self { carts, search }
    }

    pub fn carts(&self) -> &CartSyncController {
        &self.carts
    }

    pub fn faceted_search(&self) -> Option<&FacetedSearch> {
        self.search.as_ref()
    }

    /// Page initialisation: sync the "remove all" affordance with the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be fetched.
    pub async fn on_ready(&self) -> Result<bool, CartSyncError> {
        self.carts.refresh_remove_all_visibility().await
    }

    /// Handle a sort submission from the page at `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if `location` is not a valid page location or the
    /// faceted search submission fails.
    pub async fn on_sort_submitted(
        &self,
        location: &str,
        sort: &str,
    ) -> Result<SortOutcome, PageError> {
        if let Some(search) = &self.search {
            let params = FacetParams::from_location(location)?.with_sort(sort);

            return Ok(SortOutcome::Searched(
                search.submit_facet_change(&params).await?,
            ));
        }

        let target = sort_by_location(location, sort)?;

        debug!("no faceted search, navigating to {target}");

        self.carts.view().navigate(&target);

        Ok(SortOutcome::Navigated(target))
    }
}
