//! PostgreSQL-backed menu lookup, order store, and order read queries.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::StorageError;
use super::commit::{OrderStore, OrderUnit};
use super::pricing::MenuLookup;
use crate::models::menu::MenuSnapshot;
use crate::models::order::{OrderDetail, OrderHeader, OrderRecord};

/// Menu lookup against the `menus` table.
#[derive(Clone)]
pub struct PgMenuLookup {
    pool: PgPool,
}

impl PgMenuLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuLookup for PgMenuLookup {
    async fn find_menu(&self, menu_id: &str) -> Result<Option<MenuSnapshot>, StorageError> {
        let row = sqlx::query_as::<_, (i64, i64)>("SELECT price, stock FROM menus WHERE id = $1")
            .bind(menu_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(unit_price, available_stock)| MenuSnapshot {
            unit_price,
            available_stock,
        }))
    }
}

/// Order store that opens one database transaction per unit of work.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>, StorageError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgOrderUnit { tx }))
    }
}

/// sqlx rolls the transaction back when it is dropped uncommitted.
pub struct PgOrderUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderUnit for PgOrderUnit {
    async fn insert_header(&mut self, header: &OrderHeader) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO transactions (id, total_price, created_at) VALUES ($1, $2, $3)")
            .bind(&header.id)
            .bind(header.total)
            .bind(header.created_at)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn insert_detail(
        &mut self,
        line_no: usize,
        detail: &OrderDetail,
    ) -> Result<(), StorageError> {
        let line_no = i32::try_from(line_no)
            .map_err(|_| StorageError::Internal(format!("line number {line_no} out of range")))?;
        sqlx::query(
            r#"
            INSERT INTO transaction_details (transaction_id, menu_id, line_no, qty, subtotal)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&detail.order_id)
        .bind(&detail.menu_id)
        .bind(line_no)
        .bind(detail.quantity)
        .bind(detail.subtotal)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn decrement_stock(&mut self, menu_id: &str, quantity: i64) -> Result<(), StorageError> {
        // Conditional decrement: concurrent orders serialize on the row lock.
        let result =
            sqlx::query("UPDATE menus SET stock = stock - $1 WHERE id = $2 AND stock >= $1")
                .bind(quantity)
                .bind(menu_id)
                .execute(&mut *self.tx)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::StockUnavailable {
                menu_id: menu_id.to_string(),
            });
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let PgOrderUnit { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct HeaderRow {
    id: String,
    total_price: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct DetailRow {
    transaction_id: String,
    menu_id: String,
    qty: i64,
    subtotal: i64,
}

impl From<DetailRow> for OrderDetail {
    fn from(row: DetailRow) -> Self {
        Self {
            order_id: row.transaction_id,
            menu_id: row.menu_id,
            quantity: row.qty,
            subtotal: row.subtotal,
        }
    }
}

/// List all orders, newest first, with their details.
pub async fn list_orders(pool: &PgPool) -> Result<Vec<OrderRecord>, sqlx::Error> {
    let headers = sqlx::query_as::<_, HeaderRow>(
        r#"
        SELECT id, total_price, created_at
        FROM transactions
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let ids: Vec<String> = headers.iter().map(|h| h.id.clone()).collect();
    let detail_rows = sqlx::query_as::<_, DetailRow>(
        r#"
        SELECT transaction_id, menu_id, qty, subtotal
        FROM transaction_details
        WHERE transaction_id = ANY($1)
        ORDER BY transaction_id, line_no ASC
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<String, Vec<OrderDetail>> = HashMap::new();
    for row in detail_rows {
        by_order
            .entry(row.transaction_id.clone())
            .or_default()
            .push(row.into());
    }

    Ok(headers
        .into_iter()
        .map(|h| OrderRecord {
            details: by_order.remove(&h.id).unwrap_or_default(),
            id: h.id,
            total: h.total_price,
            created_at: h.created_at,
        })
        .collect())
}

/// Get one order with its details.
pub async fn get_order(pool: &PgPool, order_id: &str) -> Result<OrderRecord, sqlx::Error> {
    let header = sqlx::query_as::<_, HeaderRow>(
        "SELECT id, total_price, created_at FROM transactions WHERE id = $1",
    )
    .bind(order_id)
    .fetch_one(pool)
    .await?;

    let details = sqlx::query_as::<_, DetailRow>(
        r#"
        SELECT transaction_id, menu_id, qty, subtotal
        FROM transaction_details
        WHERE transaction_id = $1
        ORDER BY line_no ASC
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(OrderRecord {
        id: header.id,
        total: header.total_price,
        created_at: header.created_at,
        details: details.into_iter().map(OrderDetail::from).collect(),
    })
}
