//! Order placement.
//!
//! Pricing turns requested line items into a [`ResolvedOrder`] using a
//! [`pricing::MenuLookup`]; the commit writes header, details and stock
//! decrements through one [`commit::OrderUnit`], all or nothing.
//!
//! [`ResolvedOrder`]: crate::models::order::ResolvedOrder

pub mod commit;
pub mod postgres;
pub mod pricing;
pub mod service;

#[cfg(test)]
pub(crate) mod memory;

use std::time::Duration;

use thiserror::Error;

use crate::models::order::SkippedItem;

/// Storage collaborator failures. Never partially applied.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stock unavailable for menu {menu_id}")]
    StockUnavailable { menu_id: String },

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Storage error: {0}")]
    Internal(String),
}

/// Pricing failures.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Order has no valid items")]
    NoValidItems { skipped: Vec<SkippedItem> },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of the full place-order flow.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order has no valid items")]
    NoValidItems { skipped: Vec<SkippedItem> },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<PricingError> for OrderError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::NoValidItems { skipped } => OrderError::NoValidItems { skipped },
            PricingError::Storage(e) => OrderError::Storage(e),
        }
    }
}
