//! Menu persistence.

use sqlx::PgPool;

use crate::models::menu::Menu;
use crate::uuid::generate_id;

/// List all menu items ordered by name.
pub async fn list_menus(pool: &PgPool) -> Result<Vec<Menu>, sqlx::Error> {
    sqlx::query_as::<_, Menu>(
        r#"
        SELECT id, name, price, stock, created_at
        FROM menus
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Get a menu item by ID.
pub async fn get_menu(pool: &PgPool, menu_id: &str) -> Result<Menu, sqlx::Error> {
    sqlx::query_as::<_, Menu>(
        r#"
        SELECT id, name, price, stock, created_at
        FROM menus
        WHERE id = $1
        "#,
    )
    .bind(menu_id)
    .fetch_one(pool)
    .await
}

/// Create a new menu item.
pub async fn create_menu(
    pool: &PgPool,
    name: &str,
    price: i64,
    stock: i64,
) -> Result<Menu, sqlx::Error> {
    sqlx::query_as::<_, Menu>(
        r#"
        INSERT INTO menus (id, name, price, stock)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, price, stock, created_at
        "#,
    )
    .bind(generate_id())
    .bind(name)
    .bind(price)
    .bind(stock)
    .fetch_one(pool)
    .await
}

/// Replace a menu item's name, price and stock.
///
/// Past orders keep the subtotal frozen at order time.
pub async fn update_menu(
    pool: &PgPool,
    menu_id: &str,
    name: &str,
    price: i64,
    stock: i64,
) -> Result<Menu, sqlx::Error> {
    sqlx::query_as::<_, Menu>(
        r#"
        UPDATE menus
        SET name = $2, price = $3, stock = $4
        WHERE id = $1
        RETURNING id, name, price, stock, created_at
        "#,
    )
    .bind(menu_id)
    .bind(name)
    .bind(price)
    .bind(stock)
    .fetch_one(pool)
    .await
}

/// Delete a menu item.
///
/// Fails with `RowNotFound` when no menu has this ID, and with a foreign key
/// violation while transactions still reference it.
pub async fn delete_menu(pool: &PgPool, menu_id: &str) -> Result<(), sqlx::Error> {
    let result = sqlx::query("DELETE FROM menus WHERE id = $1")
        .bind(menu_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}
