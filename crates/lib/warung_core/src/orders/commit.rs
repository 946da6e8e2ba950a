//! Atomic order commit.
//!
//! The header, every detail row and every stock decrement are written
//! through one [`OrderUnit`]. A unit that is dropped without `commit`
//! discards everything it staged, so any early return below (including
//! cancellation of the surrounding future) leaves storage untouched.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use super::StorageError;
use crate::models::order::{CommittedOrder, OrderDetail, OrderHeader, ResolvedOrder};

/// Opens units of work against durable storage.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>, StorageError>;
}

/// One all-or-nothing write scope.
#[async_trait]
pub trait OrderUnit: Send {
    async fn insert_header(&mut self, header: &OrderHeader) -> Result<(), StorageError>;

    /// `line_no` is the detail's position within the order.
    async fn insert_detail(
        &mut self,
        line_no: usize,
        detail: &OrderDetail,
    ) -> Result<(), StorageError>;

    /// Must fail with [`StorageError::StockUnavailable`] instead of going negative.
    async fn decrement_stock(&mut self, menu_id: &str, quantity: i64) -> Result<(), StorageError>;

    async fn commit(self: Box<Self>) -> Result<(), StorageError>;
}

/// Commit a priced order durably.
pub async fn commit_order<S>(store: &S, order: &ResolvedOrder) -> Result<CommittedOrder, StorageError>
where
    S: OrderStore + ?Sized,
{
    if order.details.is_empty() {
        return Err(StorageError::Internal(format!(
            "order {} has no details",
            order.id
        )));
    }

    let header = OrderHeader {
        id: order.id.clone(),
        total: order.total,
        created_at: Utc::now(),
    };

    match write_order(store, &header, &order.details).await {
        Ok(()) => {
            info!(order_id = %order.id, total = order.total, lines = order.details.len(), "order committed");
            Ok(CommittedOrder {
                order: order.clone(),
                created_at: header.created_at,
            })
        }
        Err(e) => {
            error!(order_id = %order.id, error = %e, "order commit rolled back");
            Err(e)
        }
    }
}

async fn write_order<S>(
    store: &S,
    header: &OrderHeader,
    details: &[OrderDetail],
) -> Result<(), StorageError>
where
    S: OrderStore + ?Sized,
{
    let mut unit = store.begin().await?;

    unit.insert_header(header).await?;
    for (line_no, detail) in details.iter().enumerate() {
        unit.insert_detail(line_no, detail).await?;
    }
    for detail in details {
        unit.decrement_stock(&detail.menu_id, detail.quantity).await?;
    }

    unit.commit().await
}
