//! Order pricing.
//!
//! Line items are processed strictly in request order. Items that reference
//! a missing menu, ask for a non-positive quantity, or exceed the remaining
//! stock are skipped and reported; they never fail the whole order. Stock is
//! first-come-first-served within one order: accepted items reserve their
//! quantity, so a later line for the same menu sees what is left.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{PricingError, StorageError};
use crate::models::menu::MenuSnapshot;
use crate::models::order::{LineItem, OrderDetail, PricedOrder, ResolvedOrder, SkipReason, SkippedItem};
use crate::uuid::generate_id;

/// Read access to menu price and stock.
#[async_trait]
pub trait MenuLookup: Send + Sync {
    /// Returns `None` when no menu has this id.
    async fn find_menu(&self, menu_id: &str) -> Result<Option<MenuSnapshot>, StorageError>;
}

/// Price `items` under a freshly generated order id.
pub async fn price_order<L>(lookup: &L, items: &[LineItem]) -> Result<PricedOrder, PricingError>
where
    L: MenuLookup + ?Sized,
{
    price_order_with_id(lookup, generate_id(), items).await
}

/// Price `items` under the given order id.
pub async fn price_order_with_id<L>(
    lookup: &L,
    order_id: String,
    items: &[LineItem],
) -> Result<PricedOrder, PricingError>
where
    L: MenuLookup + ?Sized,
{
    let mut reserved: HashMap<&str, i64> = HashMap::new();
    let mut details = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();
    let mut total: i64 = 0;

    for (index, item) in items.iter().enumerate() {
        let outcome = match lookup.find_menu(&item.menu_id).await? {
            None => Err(SkipReason::MenuNotFound),
            Some(menu) => {
                let already = reserved.get(item.menu_id.as_str()).copied().unwrap_or(0);
                price_line(item, menu, already, total)
            }
        };

        match outcome {
            Ok((subtotal, new_total)) => {
                total = new_total;
                *reserved.entry(item.menu_id.as_str()).or_insert(0) += item.quantity;
                details.push(OrderDetail {
                    order_id: order_id.clone(),
                    menu_id: item.menu_id.clone(),
                    quantity: item.quantity,
                    subtotal,
                });
            }
            Err(reason) => {
                warn!(
                    order_id = %order_id,
                    menu_id = %item.menu_id,
                    quantity = item.quantity,
                    %reason,
                    "skipping line item"
                );
                skipped.push(SkippedItem {
                    index,
                    menu_id: item.menu_id.clone(),
                    quantity: item.quantity,
                    reason,
                });
            }
        }
    }

    if details.is_empty() {
        warn!(order_id = %order_id, requested = items.len(), "order has no valid items");
        return Err(PricingError::NoValidItems { skipped });
    }

    debug!(order_id = %order_id, lines = details.len(), total, "order priced");
    Ok(PricedOrder {
        order: ResolvedOrder {
            id: order_id,
            details,
            total,
        },
        skipped,
    })
}

/// Validate one line against its snapshot; returns (subtotal, new running total).
fn price_line(
    item: &LineItem,
    menu: MenuSnapshot,
    already_reserved: i64,
    total: i64,
) -> Result<(i64, i64), SkipReason> {
    if item.quantity <= 0 {
        return Err(SkipReason::InvalidQuantity);
    }
    if item.quantity > menu.available_stock - already_reserved {
        return Err(SkipReason::InsufficientStock);
    }
    let subtotal = menu
        .unit_price
        .checked_mul(item.quantity)
        .ok_or(SkipReason::PriceOverflow)?;
    let new_total = total
        .checked_add(subtotal)
        .ok_or(SkipReason::PriceOverflow)?;
    Ok((subtotal, new_total))
}
