//! Storefront category page: cart reconciliation and faceted search.
//!
//! The page surface (navigation, notifications, region replacement) is
//! injected through the [`carts::CartView`] and [`search::PageRegions`]
//! traits; the remote cart and search resources sit behind
//! [`carts::CartApi`] and [`search::SearchApi`].

pub mod carts;
pub mod context;
pub mod http;
pub mod page;
pub mod search;
