//! Authentication service: login/register flows delegating to `warung_core::auth`.

use sqlx::PgPool;
use tracing::info;
use warung_core::auth::AuthError;
use warung_core::auth::jwt::TokenCodec;
use warung_core::auth::password::{hash_password, verify_password};
use warung_core::auth::queries;
use warung_core::models::auth::Principal;

use crate::error::{AppError, AppResult};
use crate::models::{LoginResponse, UserResponse};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_account(username: &str, password: Option<&str>) -> AppResult<()> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if let Some(password) = password
        && password.len() < MIN_PASSWORD_LEN
    {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Authenticate with username + password and issue an access token.
///
/// Unknown usernames and wrong passwords produce the same error.
pub async fn login(
    pool: &PgPool,
    tokens: &TokenCodec,
    username: &str,
    password: &str,
) -> AppResult<LoginResponse> {
    let user = queries::find_user_by_username(pool, username)
        .await?
        .ok_or(AuthError::CredentialError)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::CredentialError.into());
    }

    let token = tokens
        .issue(&Principal::from(&user.user))
        .map_err(|e| AppError::Internal(format!("cannot generate token: {e}")))?;

    info!(user_id = %user.user.id, "user logged in");
    Ok(LoginResponse {
        message: "you are logged in".into(),
        token,
        token_type: "Bearer".into(),
        expires_in: tokens.expires_in(),
    })
}

/// Register a new user account.
pub async fn register(
    pool: &PgPool,
    name: &str,
    username: &str,
    password: &str,
) -> AppResult<UserResponse> {
    validate_account(username, Some(password))?;

    // Fast path; a concurrent duplicate is still caught by the unique index.
    if queries::username_exists(pool, username).await? {
        return Err(AppError::Validation("Username already registered".into()));
    }

    let pw_hash = hash_password(password)?;
    let user = queries::create_user(pool, name, username, &pw_hash).await?;

    info!(user_id = %user.id, "user registered");
    Ok(user.into())
}
