//! User account handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{ListUsersQuery, MessageResponse, UpdateUserRequest, UserResponse};
use crate::services::users;

/// `GET /user`, optionally `?name=` to search by name.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = users::list_users(&state.pool, query.name.as_deref()).await?;
    Ok(Json(users))
}

/// `GET /user/{id}`
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(users::get_user(&state.pool, &id).await?))
}

/// `PUT /user/{id}`: requires authentication.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(users::update_user(&state.pool, &id, &body).await?))
}

/// `DELETE /user/{id}`: requires authentication.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    users::delete_user(&state.pool, &id).await?;
    Ok(Json(MessageResponse {
        message: "user deleted".into(),
    }))
}
