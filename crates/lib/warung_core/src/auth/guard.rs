//! Bearer token guard.
//!
//! Decides allow/deny for a raw `Authorization` header value. Fail-closed:
//! every error means the request must not proceed.

use thiserror::Error;
use tracing::debug;

use super::jwt::{TokenError, TokenVerifier};
use crate::models::auth::TokenClaims;

/// Required scheme prefix, case-sensitive with exactly one space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Guard failures. The display text is safe to show to clients.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid authorization scheme")]
    MalformedScheme,

    #[error("Invalid or expired token")]
    Invalid(#[source] TokenError),
}

/// Authorize a request from its `Authorization` header value.
///
/// Scheme problems are rejected before the verifier is consulted.
pub fn authorize<V>(header: Option<&str>, verifier: &V) -> Result<TokenClaims, GuardError>
where
    V: TokenVerifier + ?Sized,
{
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => {
            debug!("rejecting request without authorization header");
            return Err(GuardError::MissingHeader);
        }
    };

    let token = header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        debug!("rejecting non-bearer authorization scheme");
        GuardError::MalformedScheme
    })?;

    if token.is_empty() {
        debug!("rejecting bearer header with empty token");
        return Err(GuardError::MalformedScheme);
    }

    verifier.verify(token).map_err(|e| {
        debug!(reason = %e, "token verification failed");
        GuardError::Invalid(e)
    })
}
