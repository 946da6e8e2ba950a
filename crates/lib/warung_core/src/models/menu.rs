//! Menu domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Menu row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

/// Price and stock of a menu entry at the moment of lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSnapshot {
    pub unit_price: i64,
    pub available_stock: i64,
}
