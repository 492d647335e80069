//! Filter, sort and pagination parameters.

use std::collections::BTreeMap;

use reqwest::Url;
use thiserror::Error;
use tracing::debug;

use crate::search::validation::{PriceRange, PriceValidationError, validate_price_range};

pub const SORT_KEY: &str = "sort";
pub const PAGE_KEY: &str = "page";
pub const PRICE_MIN_KEY: &str = "price_min";
pub const PRICE_MAX_KEY: &str = "price_max";

// Only used to resolve relative locations; never requested.
const LOCATION_BASE: &str = "http://storefront.invalid";

#[derive(Debug, Error)]
#[error("invalid page location: {0}")]
pub struct LocationError(String);

/// Raw price range input, validated at submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceInput {
    pub min: String,
    pub max: String,
}

/// Caller-supplied search parameters for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetParams {
    /// Page path the search runs against, e.g. `/shoes/`.
    pub path: String,

    /// Selected facet values keyed by facet name.
    pub filters: BTreeMap<String, Vec<String>>,

    pub sort: Option<String>,
    pub page: Option<u32>,
    pub price: Option<PriceInput>,
}

impl FacetParams {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Parse a page location (`/shoes/?brand=Acme&sort=newest`) into
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be resolved as a URL.
    pub fn from_location(location: &str) -> Result<Self, LocationError> {
        let url = resolve(location)?;
        let mut params = Self::new(url.path());
        let mut price_min = None;
        let mut price_max = None;

        for (key, value) in url.query_pairs() {
            match &*key {
                SORT_KEY => params.sort = Some(value.into_owned()),
                PAGE_KEY => match value.parse() {
                    Ok(page) => params.page = Some(page),
                    Err(error) => debug!("ignoring page `{value}` in {location}: {error}"),
                },
                PRICE_MIN_KEY => price_min = Some(value.into_owned()),
                PRICE_MAX_KEY => price_max = Some(value.into_owned()),
                _ => params
                    .filters
                    .entry(key.to_string())
                    .or_default()
                    .push(value.into_owned()),
            }
        }

        if price_min.is_some() || price_max.is_some() {
            params.price = Some(PriceInput {
                min: price_min.unwrap_or_default(),
                max: price_max.unwrap_or_default(),
            });
        }

        Ok(params)
    }

    #[must_use]
    pub fn with_filter(mut self, facet: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .entry(facet.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Set the sort order. A new order starts again from the first page.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self.page = None;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_price(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.price = Some(PriceInput {
            min: min.into(),
            max: max.into(),
        });
        self
    }

    /// Validate the price range, if one was entered.
    ///
    /// # Errors
    ///
    /// Returns the first failing price check.
    pub fn validated_price(&self) -> Result<Option<PriceRange>, PriceValidationError> {
        self.price
            .as_ref()
            .map(|price| validate_price_range(&price.min, &price.max))
            .transpose()
    }

    /// Query pairs for these parameters, with an already validated price range.
    pub(crate) fn query(&self, price: Option<&PriceRange>) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .filters
            .iter()
            .flat_map(|(facet, values)| {
                values
                    .iter()
                    .map(move |value| (facet.clone(), value.clone()))
            })
            .collect();

        if let Some(price) = price {
            query.push((PRICE_MIN_KEY.to_string(), price.min.to_string()));
            query.push((PRICE_MAX_KEY.to_string(), price.max.to_string()));
        }

        if let Some(sort) = &self.sort {
            query.push((SORT_KEY.to_string(), sort.clone()));
        }

        if let Some(page) = self.page {
            query.push((PAGE_KEY.to_string(), page.to_string()));
        }

        query
    }
}

/// Location to navigate to when a sort is submitted on a page without
/// faceted search: `sort` is replaced and `page` dropped, other query
/// parameters are kept.
///
/// # Errors
///
/// Returns an error if the location cannot be resolved as a URL.
pub fn sort_by_location(location: &str, sort: &str) -> Result<String, LocationError> {
    let mut url = resolve(location)?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != SORT_KEY && key != PAGE_KEY)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(SORT_KEY, sort);

    Ok(match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    })
}

fn resolve(location: &str) -> Result<Url, LocationError> {
    Url::parse(LOCATION_BASE)
        .and_then(|base| base.join(location))
        .map_err(|source| LocationError(source.to_string()))
}
