//! Transaction (order) request handlers. All routes require authentication.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::info;
use warung_core::orders::postgres;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateTransactionRequest, TransactionCreatedResponse, TransactionResponse};

/// `GET /transaction`: list orders, newest first.
pub async fn list_transactions_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TransactionResponse>>> {
    let orders = postgres::list_orders(&state.pool).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// `GET /transaction/{id}`: get one order with its items.
pub async fn get_transaction_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TransactionResponse>> {
    let order = postgres::get_order(&state.pool, &id).await?;
    Ok(Json(order.into()))
}

/// `POST /transaction`: price the requested items and commit the order.
pub async fn create_transaction_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<CreateTransactionRequest>,
) -> AppResult<(StatusCode, Json<TransactionCreatedResponse>)> {
    let placed = state.order_service().place_order(&body.line_items()).await?;

    info!(
        order_id = %placed.order.id,
        user_id = %claims.user_id,
        skipped = placed.skipped.len(),
        "transaction created"
    );
    Ok((
        StatusCode::CREATED,
        Json(TransactionCreatedResponse {
            message: "transaction created".into(),
            data: placed.into(),
        }),
    ))
}
