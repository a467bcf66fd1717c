//! Order placement error types.

use thiserror::Error;

use super::FieldError;
use crate::store::StoreError;

/// Ways placing an order can fail.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// The submission failed validation. Nothing was written.
    #[error("order rejected with {} validation error(s)", .0.len())]
    Rejected(Vec<FieldError>),

    /// The catalog could not be read. Nothing was written.
    #[error("failed to read product catalog: {0}")]
    CatalogUnavailable(#[source] StoreError),

    /// Writing the decremented catalog failed. The catalog was restored
    /// from its snapshot (best effort) and no order was created.
    #[error("failed to update product stock: {0}")]
    StockCommit(#[source] StoreError),

    /// The order file could not be read, in which case nothing was written,
    /// or could not be written after stock was committed.
    #[error("failed to save order: {0}")]
    OrderWrite(#[source] StoreError),
}

impl PlaceOrderError {
    /// Message returned to the client for server-side failures.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "Order validation failed.",
            Self::CatalogUnavailable(_) => "Failed to read product catalog.",
            Self::StockCommit(_) => "Failed to update product stock.",
            Self::OrderWrite(_) => "Failed to save order.",
        }
    }
}
