//! Carts

pub mod api;
pub mod controller;
pub mod errors;
pub mod models;
pub mod view;

pub use api::{CartApi, HttpCartApi, MockCartApi};
pub use controller::*;
pub use errors::{CartOperation, CartSyncError};
pub use view::{CartView, MockCartView};
