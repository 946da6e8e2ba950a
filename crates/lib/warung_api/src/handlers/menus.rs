//! Menu request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;
use warung_core::menus;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{MenuRequest, MenuResponse, MessageResponse};

/// `GET /menu`: list all menu items.
pub async fn list_menus_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MenuResponse>>> {
    let rows = menus::list_menus(&state.pool).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `GET /menu/{id}`: get one menu item.
pub async fn get_menu_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuResponse>> {
    let menu = menus::get_menu(&state.pool, &id).await?;
    Ok(Json(menu.into()))
}

fn validate_menu(body: &MenuRequest) -> AppResult<()> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Menu name is required".into()));
    }
    if body.price < 0 || body.stock < 0 {
        return Err(AppError::Validation(
            "Price and stock must not be negative".into(),
        ));
    }
    Ok(())
}

/// `POST /menu`: create a menu item. Requires authentication.
pub async fn create_menu_handler(
    State(state): State<AppState>,
    Json(body): Json<MenuRequest>,
) -> AppResult<(StatusCode, Json<MenuResponse>)> {
    validate_menu(&body)?;
    let menu = menus::create_menu(&state.pool, &body.name, body.price, body.stock).await?;
    Ok((StatusCode::CREATED, Json(menu.into())))
}

/// `PUT /menu/{id}`: replace name, price and stock. Requires authentication.
pub async fn update_menu_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MenuRequest>,
) -> AppResult<Json<MenuResponse>> {
    validate_menu(&body)?;
    let menu = menus::update_menu(&state.pool, &id, &body.name, body.price, body.stock).await?;
    info!(menu_id = %menu.id, price = menu.price, stock = menu.stock, "menu updated");
    Ok(Json(menu.into()))
}

/// `DELETE /menu/{id}`: requires authentication. Menus already ordered stay.
pub async fn delete_menu_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    match menus::delete_menu(&state.pool, &id).await {
        Ok(()) => {}
        Err(e) if e.as_database_error().is_some_and(|d| d.is_foreign_key_violation()) => {
            return Err(AppError::Validation(
                "Menu is referenced by existing transactions".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    }
    info!(menu_id = %id, "menu deleted");
    Ok(Json(MessageResponse {
        message: "menu deleted".into(),
    }))
}
