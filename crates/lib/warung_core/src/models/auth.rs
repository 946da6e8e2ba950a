//! Authentication domain models.

use serde::{Deserialize, Serialize};

/// Domain user (never carries the password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// User with password hash (for internal login flows).
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: String,
}

/// The authenticated identity embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub username: String,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer: the configured application name.
    pub iss: String,
    /// Issued at (unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (unix timestamp, seconds).
    pub exp: i64,
    pub user_id: String,
    pub username: String,
}

impl TokenClaims {
    /// The principal these claims were issued for.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }
}
