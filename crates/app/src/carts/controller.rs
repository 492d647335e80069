//! Cart sync controller.
//!
//! Reconciles page actions with the remote cart. Cart state is never cached:
//! every operation re-fetches the cart before deciding between create, append
//! and delete, and page side effects only happen after the remote call they
//! depend on has succeeded.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tracing::{debug, info, warn};

use crate::carts::{
    api::CartApi,
    errors::{CartOperation, CartSyncError},
    models::{Cart, CartId, LineItemRequest},
    view::CartView,
};

/// Default product added by the "add test item" action.
pub const DEFAULT_TEST_PRODUCT_ID: u64 = 112;

/// Default cart view path.
pub const DEFAULT_CART_PATH: &str = "/cart.php";

/// Default notification shown once the cart has been emptied.
pub const DEFAULT_REMOVAL_MESSAGE: &str = "All items have been removed from your cart!";

/// Settings for the cart actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    /// Line item added by [`CartSyncController::add_test_item`].
    pub test_item: LineItemRequest,

    /// Where the shopper is sent after a successful mutation.
    pub cart_path: String,

    /// Notification text after the cart is removed.
    pub removal_message: String,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            test_item: LineItemRequest {
                quantity: 1,
                product_id: DEFAULT_TEST_PRODUCT_ID,
            },
            cart_path: DEFAULT_CART_PATH.to_string(),
            removal_message: DEFAULT_REMOVAL_MESSAGE.to_string(),
        }
    }
}

/// Which branch [`CartSyncController::add_test_item`] took.
///
/// Each carries the updated cart when the storefront returned a decodable
/// one.
#[derive(Debug, Clone, PartialEq)]
pub enum AddItemOutcome {
    /// No cart existed; a new one was created.
    Created(Option<Cart>),

    /// The item was appended to the existing cart.
    Appended(Option<Cart>),
}

impl AddItemOutcome {
    /// The cart as returned by the storefront after the mutation.
    pub fn cart(&self) -> Option<&Cart> {
        match self {
            Self::Created(cart) | Self::Appended(cart) => cart.as_ref(),
        }
    }
}

/// Result of [`CartSyncController::remove_all_items`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveAllOutcome {
    /// The cart with this id was deleted.
    Removed(CartId),

    /// There was no cart; nothing was sent.
    NoCart,
}

/// Cart actions for one page, reconciled against the remote cart.
pub struct CartSyncController {
    api: Arc<dyn CartApi>,
    view: Arc<dyn CartView>,
    settings: CartSettings,
}

impl Debug for CartSyncController {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartSyncController")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CartSyncController {
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>, view: Arc<dyn CartView>, settings: CartSettings) -> Self {
        Self {
            api,
            view,
            settings,
        }
    }

    /// The page surface this controller drives.
    pub fn view(&self) -> &Arc<dyn CartView> {
        &self.view
    }

    /// Add the configured test item, creating a cart only when none exists.
    ///
    /// Navigates to the cart view once the mutation has succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`CartSyncError::Fetch`] if the cart cannot be read and
    /// [`CartSyncError::Mutation`] if the create or append call fails. No
    /// navigation happens in either case.
    pub async fn add_test_item(&self) -> Result<AddItemOutcome, CartSyncError> {
        let item = self.settings.test_item;
        let carts = self.fetch_carts().await?;

        let outcome = match carts.first() {
            None => {
                info!("no cart found, creating one");

                self.api
                    .create_cart(item)
                    .await
                    .map(AddItemOutcome::Created)
                    .map_err(CartSyncError::mutation(CartOperation::Create))?
            }
            Some(cart) => {
                debug!("appending to existing cart {}", cart.id);

                self.api
                    .add_items(&cart.id, item)
                    .await
                    .map(AddItemOutcome::Appended)
                    .map_err(CartSyncError::mutation(CartOperation::AppendItems))?
            }
        };

        self.view.navigate(&self.settings.cart_path);

        Ok(outcome)
    }

    /// Delete the shopper's cart if there is one.
    ///
    /// On success the shopper is notified, the "remove all" affordance is
    /// hidden and the cart view is opened, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`CartSyncError::Fetch`] if the cart cannot be read and
    /// [`CartSyncError::Mutation`] if the delete fails. The page is left
    /// untouched in either case.
    pub async fn remove_all_items(&self) -> Result<RemoveAllOutcome, CartSyncError> {
        let carts = self.fetch_carts().await?;

        let Some(cart) = carts.into_iter().next() else {
            debug!("no cart to remove");

            return Ok(RemoveAllOutcome::NoCart);
        };

        self.api
            .delete_cart(&cart.id)
            .await
            .map_err(CartSyncError::mutation(CartOperation::Delete))?;

        info!("removed cart {}", cart.id);

        self.view.notify_success(&self.settings.removal_message);
        self.view.set_remove_all_visible(false);
        self.view.navigate(&self.settings.cart_path);

        Ok(RemoveAllOutcome::Removed(cart.id))
    }

    /// Show the "remove all" affordance only while a cart exists.
    ///
    /// Returns the visibility that was applied.
    ///
    /// # Errors
    ///
    /// Returns [`CartSyncError::Fetch`] if the cart cannot be read; visibility
    /// is left as it was.
    pub async fn refresh_remove_all_visibility(&self) -> Result<bool, CartSyncError> {
        let visible = !self.fetch_carts().await?.is_empty();

        self.view.set_remove_all_visible(visible);

        Ok(visible)
    }

    async fn fetch_carts(&self) -> Result<Vec<Cart>, CartSyncError> {
        self.api.get_carts().await.map_err(|source| {
            warn!("cart fetch failed: {source}");

            CartSyncError::Fetch(source)
        })
    }
}
