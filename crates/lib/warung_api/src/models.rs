//! Request and response bodies.
//!
//! Kept separate from `warung_core::models` so the wire shape (camelCase)
//! can change without touching domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warung_core::models::auth::User;
use warung_core::models::menu::Menu;
use warung_core::models::order::{
    LineItem, OrderDetail, OrderRecord, PlacedOrder, SkipReason, SkippedItem,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Per-item reasons when an order is rejected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedItemResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub db_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            username: u.username,
        }
    }
}

/// `GET /user?name=..`
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub name: Option<String>,
}

/// `PUT /user/{id}`; the password is kept when omitted.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: String,
    pub username: String,
    pub expires_at: i64,
}

/// Body of `POST /menu` and `PUT /menu/{id}`.
#[derive(Debug, Deserialize)]
pub struct MenuRequest {
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Menu> for MenuResponse {
    fn from(m: Menu) -> Self {
        Self {
            id: m.id,
            name: m.name,
            price: m.price,
            stock: m.stock,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItemRequest {
    pub menu_id: String,
    pub qty: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub items: Vec<TransactionItemRequest>,
}

impl CreateTransactionRequest {
    pub fn line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|i| LineItem::new(i.menu_id.clone(), i.qty))
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItemResponse {
    pub menu_id: String,
    pub qty: i64,
    pub subtotal: i64,
}

impl From<OrderDetail> for TransactionItemResponse {
    fn from(d: OrderDetail) -> Self {
        Self {
            menu_id: d.menu_id,
            qty: d.quantity,
            subtotal: d.subtotal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedItemResponse {
    pub index: usize,
    pub menu_id: String,
    pub qty: i64,
    pub reason: SkipReason,
}

impl From<SkippedItem> for SkippedItemResponse {
    fn from(s: SkippedItem) -> Self {
        Self {
            index: s.index,
            menu_id: s.menu_id,
            qty: s.quantity,
            reason: s.reason,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: String,
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<TransactionItemResponse>,
    /// Only present on creation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedItemResponse>,
}

impl From<OrderRecord> for TransactionResponse {
    fn from(r: OrderRecord) -> Self {
        Self {
            id: r.id,
            total: r.total,
            created_at: r.created_at,
            items: r.details.into_iter().map(Into::into).collect(),
            skipped: Vec::new(),
        }
    }
}

impl From<PlacedOrder> for TransactionResponse {
    fn from(p: PlacedOrder) -> Self {
        Self {
            id: p.order.id,
            total: p.order.total,
            created_at: p.created_at,
            items: p.order.details.into_iter().map(Into::into).collect(),
            skipped: p.skipped.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionCreatedResponse {
    pub message: String,
    pub data: TransactionResponse,
}
