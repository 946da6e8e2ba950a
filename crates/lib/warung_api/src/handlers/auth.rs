//! Authentication request handlers.

use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, UserResponse};
use crate::services::auth;

/// `POST /login`: authenticate with username + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let resp = auth::login(&state.pool, &state.tokens, &body.username, &body.password).await?;
    Ok(Json(resp))
}

/// `POST /register`: create a new user account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<UserResponse>> {
    let resp = auth::register(&state.pool, &body.name, &body.username, &body.password).await?;
    Ok(Json(resp))
}

/// `GET /me`: the identity carried by the caller's token.
pub async fn me_handler(
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: claims.user_id,
        username: claims.username,
        expires_at: claims.exp,
    })
}
