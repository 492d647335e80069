//! Cart Config

use clap::Args;
use storefront_app::carts::{
    CartSettings, DEFAULT_CART_PATH, DEFAULT_REMOVAL_MESSAGE, DEFAULT_TEST_PRODUCT_ID,
    models::LineItemRequest,
};

/// Cart action settings.
#[derive(Debug, Args)]
pub struct CartArgs {
    /// Product added by `add-test-item`
    #[arg(long, env = "STOREFRONT_TEST_PRODUCT_ID", default_value_t = DEFAULT_TEST_PRODUCT_ID)]
    pub product_id: u64,

    /// Quantity added by `add-test-item`
    #[arg(long, default_value_t = 1u32)]
    pub quantity: u32,

    /// Cart view path navigated to after a mutation
    #[arg(long, env = "STOREFRONT_CART_PATH", default_value = DEFAULT_CART_PATH)]
    pub cart_path: String,

    /// Notification shown after the cart is removed
    #[arg(long, default_value = DEFAULT_REMOVAL_MESSAGE)]
    pub removal_message: String,
}

impl CartArgs {
    #[must_use]
    pub fn settings(&self) -> CartSettings {
        CartSettings {
            test_item: LineItemRequest {
                quantity: self.quantity,
                product_id: self.product_id,
            },
            cart_path: self.cart_path.clone(),
            removal_message: self.removal_message.clone(),
        }
    }
}
