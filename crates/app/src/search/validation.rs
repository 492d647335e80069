//! Price range validation.
//!
//! Pure and local: nothing here touches the network. A failing check blocks
//! the search request and maps to one of the pre-supplied messages.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

/// Which input of the price range a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Min,
    Max,
}

impl Display for PriceField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Min => "minimum",
            Self::Max => "maximum",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceValidationError {
    #[error("minimum price not entered")]
    MinNotEntered,

    #[error("maximum price not entered")]
    MaxNotEntered,

    #[error("invalid {0} price")]
    InvalidValue(PriceField),

    #[error("minimum price is greater than maximum price")]
    MinGreaterThanMax,
}

/// A validated price range, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

/// Validate raw price range input.
///
/// Checks run in order: both bounds present, both non-negative numbers,
/// then `min <= max`. The first failing check is returned.
///
/// # Errors
///
/// Returns the first failing [`PriceValidationError`].
pub fn validate_price_range(min: &str, max: &str) -> Result<PriceRange, PriceValidationError> {
    let (min, max) = (min.trim(), max.trim());

    if min.is_empty() {
        return Err(PriceValidationError::MinNotEntered);
    }

    if max.is_empty() {
        return Err(PriceValidationError::MaxNotEntered);
    }

    let min = parse_price(min, PriceField::Min)?;
    let max = parse_price(max, PriceField::Max)?;

    if min > max {
        return Err(PriceValidationError::MinGreaterThanMax);
    }

    Ok(PriceRange { min, max })
}

fn parse_price(raw: &str, field: PriceField) -> Result<Decimal, PriceValidationError> {
    match Decimal::from_str(raw) {
        Ok(value) if !value.is_sign_negative() => Ok(value),
        _ => Err(PriceValidationError::InvalidValue(field)),
    }
}

/// Dictionary keys the messages are looked up under.
pub const PRICE_MIN_EVALUATION: &str = "price_min_evaluation";
pub const PRICE_MAX_EVALUATION: &str = "price_max_evaluation";
pub const PRICE_MIN_NOT_ENTERED: &str = "price_min_not_entered";
pub const PRICE_MAX_NOT_ENTERED: &str = "price_max_not_entered";
pub const PRICE_INVALID_VALUE: &str = "price_invalid_value";

/// Localised messages for each validation condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessages {
    pub on_min_price_error: String,
    pub on_max_price_error: String,
    pub min_price_not_entered: String,
    pub max_price_not_entered: String,
    pub on_invalid_price: String,
}

impl Default for ValidationMessages {
    fn default() -> Self {
        Self {
            on_min_price_error: "Min. price must be less than max. price.".to_string(),
            on_max_price_error: "Max. price must be greater than min. price.".to_string(),
            min_price_not_entered: "Min. price is required.".to_string(),
            max_price_not_entered: "Max. price is required.".to_string(),
            on_invalid_price: "Input must be greater than 0.".to_string(),
        }
    }
}

impl ValidationMessages {
    /// Read messages from a translation dictionary, keeping the defaults for
    /// missing keys.
    #[must_use]
    pub fn from_dictionary(dictionary: &FxHashMap<String, String>) -> Self {
        let defaults = Self::default();
        let lookup = |key: &str, fallback: String| dictionary.get(key).cloned().unwrap_or(fallback);

        Self {
            on_min_price_error: lookup(PRICE_MIN_EVALUATION, defaults.on_min_price_error),
            on_max_price_error: lookup(PRICE_MAX_EVALUATION, defaults.on_max_price_error),
            min_price_not_entered: lookup(PRICE_MIN_NOT_ENTERED, defaults.min_price_not_entered),
            max_price_not_entered: lookup(PRICE_MAX_NOT_ENTERED, defaults.max_price_not_entered),
            on_invalid_price: lookup(PRICE_INVALID_VALUE, defaults.on_invalid_price),
        }
    }

    /// Messages to show for `error`, per input field.
    pub fn messages_for(&self, error: PriceValidationError) -> SmallVec<[FieldMessage<'_>; 2]> {
        match error {
            PriceValidationError::MinNotEntered => {
                smallvec![FieldMessage::new(PriceField::Min, &self.min_price_not_entered)]
            }
            PriceValidationError::MaxNotEntered => {
                smallvec![FieldMessage::new(PriceField::Max, &self.max_price_not_entered)]
            }
            PriceValidationError::InvalidValue(field) => {
                smallvec![FieldMessage::new(field, &self.on_invalid_price)]
            }
            PriceValidationError::MinGreaterThanMax => smallvec![
                FieldMessage::new(PriceField::Min, &self.on_min_price_error),
                FieldMessage::new(PriceField::Max, &self.on_max_price_error),
            ],
        }
    }
}

/// A message attached to one price input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMessage<'a> {
    pub field: PriceField,
    pub message: &'a str,
}

impl<'a> FieldMessage<'a> {
    fn new(field: PriceField, message: &'a str) -> Self {
        Self { field, message }
    }
}

/// A rejected submission with the messages resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct ValidationFailure {
    pub error: PriceValidationError,
    pub messages: Vec<(PriceField, String)>,
}

impl ValidationFailure {
    pub(crate) fn new(error: PriceValidationError, messages: &ValidationMessages) -> Self {
        Self {
            error,
            messages: messages
                .messages_for(error)
                .into_iter()
                .map(|message| (message.field, message.message.to_string()))
                .collect(),
        }
    }
}
