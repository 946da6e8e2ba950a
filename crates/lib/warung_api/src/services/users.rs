//! User account management behind `/user`.

use sqlx::PgPool;
use tracing::info;
use warung_core::auth::password::hash_password;
use warung_core::auth::queries;

use super::auth::validate_account;
use crate::error::{AppError, AppResult};
use crate::models::{UpdateUserRequest, UserResponse};

/// List users, or only those whose name contains `name`.
///
/// A search with no hits is `NotFound`; an unfiltered empty list is not.
pub async fn list_users(pool: &PgPool, name: Option<&str>) -> AppResult<Vec<UserResponse>> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    let users = queries::list_users(pool, name).await?;
    if let Some(name) = name
        && users.is_empty()
    {
        return Err(AppError::NotFound(format!("no user with name like {name}")));
    }
    Ok(users.into_iter().map(Into::into).collect())
}

pub async fn get_user(pool: &PgPool, user_id: &str) -> AppResult<UserResponse> {
    Ok(queries::get_user(pool, user_id).await?.into())
}

/// Update a user; a new password is hashed before storage.
pub async fn update_user(
    pool: &PgPool,
    user_id: &str,
    req: &UpdateUserRequest,
) -> AppResult<UserResponse> {
    validate_account(&req.username, req.password.as_deref())?;
    let pw_hash = req.password.as_deref().map(hash_password).transpose()?;

    let user =
        queries::update_user(pool, user_id, &req.name, &req.username, pw_hash.as_deref()).await?;
    info!(user_id = %user.id, password_changed = pw_hash.is_some(), "user updated");
    Ok(user.into())
}

pub async fn delete_user(pool: &PgPool, user_id: &str) -> AppResult<()> {
    queries::delete_user(pool, user_id).await?;
    info!(user_id = %user_id, "user deleted");
    Ok(())
}
