//! Faceted Search

pub mod client;
pub mod config;
pub mod params;
pub mod pipeline;
pub mod regions;
pub mod validation;

pub use client::{FacetRequest, FacetRequestError, HttpSearchApi, MockSearchApi, SearchApi};
pub use config::FacetRequestConfig;
pub use params::{FacetParams, PriceInput, sort_by_location};
pub use pipeline::*;
pub use regions::{FacetResponseContent, MockPageRegions, PageEvent, PageRegions, Region};
pub use validation::{PriceValidationError, ValidationFailure, ValidationMessages};
