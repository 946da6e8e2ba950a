//! Place-order flow: price, then commit, under one storage timeout.

use std::time::Duration;

use tracing::error;

use super::commit::{OrderStore, commit_order};
use super::pricing::{MenuLookup, price_order};
use super::{OrderError, StorageError};
use crate::models::order::{LineItem, PlacedOrder};

/// Default bound on the whole place-order call.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Prices and commits orders against one lookup and one store.
pub struct OrderService<L, S> {
    lookup: L,
    store: S,
    timeout: Duration,
}

impl<L, S> OrderService<L, S>
where
    L: MenuLookup,
    S: OrderStore,
{
    pub fn new(lookup: L, store: S) -> Self {
        Self {
            lookup,
            store,
            timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Price `items` and commit the result.
    ///
    /// On timeout the in-flight unit of work is dropped, which rolls it back.
    pub async fn place_order(&self, items: &[LineItem]) -> Result<PlacedOrder, OrderError> {
        match tokio::time::timeout(self.timeout, self.price_and_commit(items)).await {
            Ok(result) => result,
            Err(_) => {
                error!(timeout = ?self.timeout, "place order timed out");
                Err(OrderError::Storage(StorageError::Timeout(self.timeout)))
            }
        }
    }

    async fn price_and_commit(&self, items: &[LineItem]) -> Result<PlacedOrder, OrderError> {
        let priced = price_order(&self.lookup, items).await?;
        let committed = commit_order(&self.store, &priced.order).await?;
        Ok(PlacedOrder {
            order: committed.order,
            created_at: committed.created_at,
            skipped: priced.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::models::menu::MenuSnapshot;
    use crate::models::order::SkipReason;
    use crate::orders::commit::OrderUnit;
    use crate::orders::memory::MemoryStore;

    /// Lets one `MemoryStore` serve as both lookup and store.
    #[derive(Clone)]
    struct Shared(Arc<MemoryStore>);

    #[async_trait]
    impl MenuLookup for Shared {
        async fn find_menu(&self, menu_id: &str) -> Result<Option<MenuSnapshot>, StorageError> {
            self.0.find_menu(menu_id).await
        }
    }

    #[async_trait]
    impl OrderStore for Shared {
        async fn begin(&self) -> Result<Box<dyn OrderUnit>, StorageError> {
            self.0.begin().await
        }
    }

    fn service(store: MemoryStore) -> (OrderService<Shared, Shared>, Shared) {
        let shared = Shared(Arc::new(store));
        (OrderService::new(shared.clone(), shared.clone()), shared)
    }

    #[tokio::test]
    async fn places_order_and_reports_skipped_items() {
        let (service, shared) =
            service(MemoryStore::new().with_menu("A", 1000, 5).with_menu("B", 200, 2));

        let placed = service
            .place_order(&[
                LineItem::new("A", 3),
                LineItem::new("missing", 1),
                LineItem::new("B", 2),
            ])
            .await
            .unwrap();

        assert_eq!(placed.order.total, 3 * 1000 + 2 * 200);
        assert_eq!(placed.order.details.len(), 2);
        assert_eq!(placed.skipped.len(), 1);
        assert_eq!(placed.skipped[0].reason, SkipReason::MenuNotFound);

        assert_eq!(shared.0.headers().len(), 1);
        assert_eq!(shared.0.headers()[0].id, placed.order.id);
        assert_eq!(shared.0.stock("A"), Some(2));
        assert_eq!(shared.0.stock("B"), Some(0));
    }

    #[tokio::test]
    async fn no_valid_items_persists_nothing() {
        let (service, shared) = service(MemoryStore::new().with_menu("A", 1000, 5));

        let err = service
            .place_order(&[LineItem::new("A", 10)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::NoValidItems { .. }));
        assert!(shared.0.headers().is_empty());
        assert_eq!(shared.0.stock("A"), Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_commit_times_out_and_rolls_back() {
        let store = MemoryStore::new()
            .with_menu("A", 1000, 5)
            .with_write_delay(Duration::from_secs(60));
        let shared = Shared(Arc::new(store));
        let service = OrderService::new(shared.clone(), shared.clone())
            .with_timeout(Duration::from_secs(1));

        let err = service
            .place_order(&[LineItem::new("A", 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrderError::Storage(StorageError::Timeout(d)) if d == Duration::from_secs(1)
        ));
        assert!(shared.0.headers().is_empty());
        assert_eq!(shared.0.stock("A"), Some(5));
    }
}
