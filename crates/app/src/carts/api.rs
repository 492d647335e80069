//! Storefront cart resource client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::{
    carts::models::{Cart, CartId, LineItemRequest, LineItemsBody},
    http::{HttpError, StorefrontHttpConfig, ensure_success},
};

/// Cart collection path, relative to the storefront origin.
pub const CARTS_PATH: &str = "/api/storefront/carts";

/// Nested resources requested alongside the cart.
pub const CART_INCLUDE: &str = "lineItems.digitalItems.options,lineItems.physicalItems.options";

#[automock]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetch the shopper's carts, including line item options.
    ///
    /// An absent cart is an empty list, never an error.
    async fn get_carts(&self) -> Result<Vec<Cart>, HttpError>;

    /// Create a new cart holding the given line item.
    ///
    /// A 2xx status confirms the mutation; the updated cart is returned when
    /// the body decodes as one.
    async fn create_cart(&self, item: LineItemRequest) -> Result<Option<Cart>, HttpError>;

    /// Append the given line item to an existing cart.
    ///
    /// Confirmation follows the same rule as [`CartApi::create_cart`].
    async fn add_items(
        &self,
        cart: &CartId,
        item: LineItemRequest,
    ) -> Result<Option<Cart>, HttpError>;

    /// Delete the cart with the given id.
    async fn delete_cart(&self, cart: &CartId) -> Result<(), HttpError>;
}

/// HTTP client for the storefront cart resource.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    config: StorefrontHttpConfig,
    http: Client,
}

impl HttpCartApi {
    /// Create a new client sharing the given HTTP client.
    #[must_use]
    pub fn new(config: StorefrontHttpConfig, http: Client) -> Self {
        Self { config, http }
    }

    fn cart_url(&self, cart: &CartId) -> String {
        self.config.url(&format!("{CARTS_PATH}/{cart}"))
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn get_carts(&self) -> Result<Vec<Cart>, HttpError> {
        let url = self.config.url(CARTS_PATH);

        debug!("fetching carts from {url}");

        let response = self
            .http
            .get(&url)
            .query(&[("include", CART_INCLUDE)])
            .send()
            .await?;

        let carts: Option<Vec<Cart>> = ensure_success(response).await?.json().await?;

        Ok(carts.unwrap_or_default())
    }

    async fn create_cart(&self, item: LineItemRequest) -> Result<Option<Cart>, HttpError> {
        let url = self.config.url(CARTS_PATH);

        debug!("creating cart at {url} for product {}", item.product_id);

        let response = self
            .http
            .post(&url)
            .json(&LineItemsBody::from(item))
            .send()
            .await?;

        Ok(confirmed_cart(ensure_success(response).await?).await)
    }

    async fn add_items(
        &self,
        cart: &CartId,
        item: LineItemRequest,
    ) -> Result<Option<Cart>, HttpError> {
        let url = format!("{}/items", self.cart_url(cart));

        debug!("appending product {} to cart {cart}", item.product_id);

        let response = self
            .http
            .post(&url)
            .json(&LineItemsBody::from(item))
            .send()
            .await?;

        Ok(confirmed_cart(ensure_success(response).await?).await)
    }

    async fn delete_cart(&self, cart: &CartId) -> Result<(), HttpError> {
        let url = self.cart_url(cart);

        debug!("deleting cart {cart}");

        let response = self.http.delete(&url).send().await?;

        ensure_success(response).await?;

        Ok(())
    }
}

/// Decode the cart from a confirmed mutation response, if it has one.
async fn confirmed_cart(response: Response) -> Option<Cart> {
    let body = match response.text().await {
        Ok(body) => body,
        Err(error) => {
            warn!("mutation confirmed but response body could not be read: {error}");

            return None;
        }
    };

    if body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(&body) {
        Ok(cart) => Some(cart),
        Err(error) => {
            warn!("mutation confirmed but response is not a cart: {error}");

            None
        }
    }
}
