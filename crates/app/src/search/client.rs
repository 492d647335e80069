//! Faceted search resource client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{
    Client,
    header::{HeaderValue, InvalidHeaderValue},
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;
use tracing::debug;

use crate::{
    http::{HttpError, StorefrontHttpConfig, ensure_success},
    search::{
        config::{FacetRequestConfig, StencilConfig},
        params::FacetParams,
        regions::{FacetResponseContent, Region},
        validation::PriceValidationError,
    },
};

pub const STENCIL_CONFIG_HEADER: &str = "stencil-config";
pub const STENCIL_OPTIONS_HEADER: &str = "stencil-options";
pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
pub const REQUESTED_WITH: &str = "stencil-utils";

/// Query key asking for every option of one facet.
pub const LIST_ALL_KEY: &str = "list_all";

#[derive(Debug, Error)]
pub enum FacetRequestError {
    #[error("search request failed")]
    Http(#[from] HttpError),

    #[error("failed to encode request config")]
    Config(#[from] serde_json::Error),

    #[error("request config is not a valid header value")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("response is missing the {0} region")]
    MissingRegion(Region),
}

/// A fully resolved search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub config: StencilConfig,
    pub templates: SmallVec<[(Region, String); 2]>,
}

impl FacetRequest {
    /// Merge the pipeline config with caller parameters.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the price range is not acceptable; no
    /// request is built in that case.
    pub fn build(
        config: &FacetRequestConfig,
        params: &FacetParams,
    ) -> Result<Self, PriceValidationError> {
        let price = params.validated_price()?;

        Ok(Self {
            path: params.path.clone(),
            query: params.query(price.as_ref()),
            config: config.config.clone(),
            templates: [Region::ProductListing, Region::Sidebar]
                .into_iter()
                .map(|region| (region, config.template_for(region).to_string()))
                .collect(),
        })
    }

    /// Request for the full option list of `facet`.
    #[must_use]
    pub fn show_more(config: &FacetRequestConfig, path: &str, facet: &str) -> Self {
        Self {
            path: path.to_string(),
            query: vec![(LIST_ALL_KEY.to_string(), facet.to_string())],
            config: config.config.clone(),
            templates: smallvec![(Region::ShowMore, config.show_more.clone())],
        }
    }

    /// Value of the `stencil-options` header.
    fn render_with(&self) -> String {
        let templates: Vec<&str> = self
            .templates
            .iter()
            .map(|(_, template)| template.as_str())
            .collect();

        serde_json::json!({ "render_with": templates.join(",") }).to_string()
    }
}

#[automock]
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Render the requested templates for the given search.
    async fn fetch(&self, request: &FacetRequest) -> Result<FacetResponseContent, FacetRequestError>;
}

/// HTTP client for the storefront's template rendering endpoint.
#[derive(Debug, Clone)]
pub struct HttpSearchApi {
    config: StorefrontHttpConfig,
    http: Client,
}

impl HttpSearchApi {
    #[must_use]
    pub fn new(config: StorefrontHttpConfig, http: Client) -> Self {
        Self { config, http }
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn fetch(&self, request: &FacetRequest) -> Result<FacetResponseContent, FacetRequestError> {
        let url = self.config.url(&request.path);

        debug!("requesting {} template(s) from {url}", request.templates.len());

        let response = self
            .http
            .get(&url)
            .query(&request.query)
            .header(STENCIL_CONFIG_HEADER, header_json(&request.config)?)
            .header(STENCIL_OPTIONS_HEADER, request.render_with())
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH)
            .send()
            .await
            .map_err(HttpError::from)?;

        let mut rendered: FxHashMap<String, String> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(HttpError::from)?;

        Ok(request
            .templates
            .iter()
            .filter_map(|(region, template)| {
                rendered
                    .remove(template)
                    .map(|fragment| (*region, fragment))
            })
            .collect())
    }
}

fn header_json<T: Serialize>(value: &T) -> Result<HeaderValue, FacetRequestError> {
    Ok(HeaderValue::from_str(&serde_json::to_string(value)?)?)
}
