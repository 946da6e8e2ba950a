//! Authentication and authorization logic.
//!
//! Provides the signed access token codec, the bearer token guard,
//! password hashing, and user queries shared with `warung_api`.

pub mod guard;
pub mod jwt;
pub mod password;
pub mod queries;

use thiserror::Error;

/// Authentication errors for login and registration flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Token error: {0}")]
    TokenError(#[from] jwt::TokenError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
