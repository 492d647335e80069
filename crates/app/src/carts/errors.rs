//! Cart sync errors.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::http::HttpError;

/// Remote cart mutation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Create,
    AppendItems,
    Delete,
}

impl Display for CartOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Create => "create cart",
            Self::AppendItems => "append cart items",
            Self::Delete => "delete cart",
        })
    }
}

#[derive(Debug, Error)]
pub enum CartSyncError {
    /// Reading the current cart failed or returned malformed data.
    #[error("failed to fetch cart")]
    Fetch(#[source] HttpError),

    /// Creating, appending to or deleting the cart failed.
    #[error("failed to {operation}")]
    Mutation {
        operation: CartOperation,
        #[source]
        source: HttpError,
    },
}

impl CartSyncError {
    pub(crate) fn mutation(operation: CartOperation) -> impl FnOnce(HttpError) -> Self {
        move |source| Self::Mutation { operation, source }
    }
}
