//! Authentication middleware: Bearer token extraction and JWT verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use warung_core::auth::guard::{GuardError, authorize};
use warung_core::models::auth::TokenClaims;

use crate::AppState;
use crate::error::AppError;

/// Key used to store verified `TokenClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Axum middleware: runs the bearer token guard on `Authorization` and
/// injects `AuthenticatedUser` into request extensions. Any failure ends
/// the request with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| GuardError::MalformedScheme)?),
    };

    let claims = authorize(header, state.tokens.as_ref())?;

    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}
