//! Order domain models.
//!
//! A [`ResolvedOrder`] owns its [`OrderDetail`]s; details only exist as part
//! of an order and are written in the same unit of work as the header.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A requested (menu id, quantity) pair. Quantity is signed so that bad
/// input is representable and rejected by pricing rather than by parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub menu_id: String,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(menu_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            menu_id: menu_id.into(),
            quantity,
        }
    }
}

/// One priced line of an order. The subtotal is frozen at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: String,
    pub menu_id: String,
    pub quantity: i64,
    pub subtotal: i64,
}

/// A priced order ready to be committed. `details` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOrder {
    pub id: String,
    pub details: Vec<OrderDetail>,
    pub total: i64,
}

/// Why a line item was left out of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MenuNotFound,
    InvalidQuantity,
    InsufficientStock,
    PriceOverflow,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::MenuNotFound => "menu not found",
            SkipReason::InvalidQuantity => "quantity must be positive",
            SkipReason::InsufficientStock => "not enough stock",
            SkipReason::PriceOverflow => "subtotal out of range",
        };
        f.write_str(s)
    }
}

/// Diagnostic entry for a skipped line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    /// Position in the request.
    pub index: usize,
    pub menu_id: String,
    pub quantity: i64,
    pub reason: SkipReason,
}

/// Output of pricing: the order plus the items that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub order: ResolvedOrder,
    pub skipped: Vec<SkippedItem>,
}

/// Header row written first inside the commit unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHeader {
    pub id: String,
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedOrder {
    pub order: ResolvedOrder,
    pub created_at: DateTime<Utc>,
}

/// A committed order plus the pricing diagnostics of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order: ResolvedOrder,
    pub created_at: DateTime<Utc>,
    pub skipped: Vec<SkippedItem>,
}

/// A stored order as read back for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub details: Vec<OrderDetail>,
}
