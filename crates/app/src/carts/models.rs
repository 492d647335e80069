//! Cart Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

/// Opaque cart identifier assigned by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CartId(String);

impl CartId {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A cart id was present but blank.
#[derive(Debug, Error)]
#[error("cart id must not be blank")]
pub struct BlankCartId;

impl TryFrom<String> for CartId {
    type Error = BlankCartId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(BlankCartId);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for CartId {
    type Error = BlankCartId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl From<CartId> for String {
    fn from(value: CartId) -> Self {
        value.0
    }
}

impl Display for CartId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,

    #[serde(default)]
    pub line_items: CartLineItems,
}

impl Cart {
    /// All line items in storefront order: physical first, then digital.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items
            .physical_items
            .iter()
            .chain(self.line_items.digital_items.iter())
    }
}

/// Line items grouped the way the storefront returns them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItems {
    #[serde(default)]
    pub physical_items: Vec<LineItem>,

    #[serde(default)]
    pub digital_items: Vec<LineItem>,
}

/// LineItem Model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub product_id: u64,
    pub quantity: u32,

    #[serde(default)]
    pub options: Vec<LineItemOption>,
}

/// Selected product option on a line item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemOption {
    pub name: String,
    pub value: String,
}

/// An intended addition to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub quantity: u32,
    pub product_id: u64,
}

/// Body shared by cart creation and item append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemsBody {
    pub line_items: SmallVec<[LineItemRequest; 1]>,
}

impl From<LineItemRequest> for LineItemsBody {
    fn from(item: LineItemRequest) -> Self {
        Self {
            line_items: smallvec![item],
        }
    }
}
