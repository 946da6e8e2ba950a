//! User queries: login lookup, registration and account management.

use sqlx::PgPool;

use super::AuthError;
use crate::models::auth::{User, UserWithPassword};
use crate::uuid::generate_id;

const USERNAME_TAKEN: &str = "Username already registered";

/// Fetch a user with their password hash by username.
pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserWithPassword>, AuthError> {
    let row = sqlx::query_as::<_, (String, String, String, String)>(
        "SELECT id, name, username, password_hash FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id, name, username, password_hash)| UserWithPassword {
        user: User { id, name, username },
        password_hash,
    }))
}

/// Check whether a username is already taken.
pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, AuthError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Create a new user, returning it.
///
/// A username taken between the caller's existence check and this insert
/// is reported as a validation error, not a database failure.
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    username: &str,
    password_hash: &str,
) -> Result<User, AuthError> {
    let id = generate_id();
    sqlx::query("INSERT INTO users (id, name, username, password_hash) VALUES ($1, $2, $3, $4)")
        .bind(&id)
        .bind(name)
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await
        .map_err(username_conflict)?;
    Ok(User {
        id,
        name: name.to_string(),
        username: username.to_string(),
    })
}

/// List users ordered by name, optionally filtered by a case-insensitive
/// substring of their name.
pub async fn list_users(pool: &PgPool, name: Option<&str>) -> Result<Vec<User>, AuthError> {
    let users = match name {
        Some(name) => {
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, name, username
                FROM users
                WHERE name ILIKE $1
                ORDER BY name ASC
                "#,
            )
            .bind(format!("%{}%", escape_like(name)))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, User>("SELECT id, name, username FROM users ORDER BY name ASC")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(users)
}

/// Get a user by ID.
pub async fn get_user(pool: &PgPool, user_id: &str) -> Result<User, AuthError> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(user)
}

/// Update name and username, and the password hash when one is given.
pub async fn update_user(
    pool: &PgPool,
    user_id: &str,
    name: &str,
    username: &str,
    password_hash: Option<&str>,
) -> Result<User, AuthError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = $2,
            username = $3,
            password_hash = COALESCE($4, password_hash)
        WHERE id = $1
        RETURNING id, name, username
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(username_conflict)?;
    Ok(user)
}

/// Delete a user. Fails with `RowNotFound` when no user has this ID.
pub async fn delete_user(pool: &PgPool, user_id: &str) -> Result<(), AuthError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound.into());
    }
    Ok(())
}

fn username_conflict(e: sqlx::Error) -> AuthError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => AuthError::ValidationError(USERNAME_TAKEN.into()),
        _ => AuthError::DbError(e),
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
