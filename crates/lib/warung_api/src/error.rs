//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use warung_core::auth::AuthError;
use warung_core::auth::guard::GuardError;
use warung_core::orders::{OrderError, StorageError};

use crate::models::{ErrorResponse, SkippedItemResponse};

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An order whose every line item was skipped; carries the reasons.
    #[error("Order rejected: {message}")]
    RejectedOrder {
        message: String,
        skipped: Vec<SkippedItemResponse>,
    },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::RejectedOrder { message, skipped } = self {
            let body = Json(ErrorResponse {
                error: "rejected_order".into(),
                message,
                skipped,
            });
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::RejectedOrder { message, .. } => {
                (StatusCode::BAD_REQUEST, "rejected_order", message.as_str())
            }
            AppError::StorageUnavailable(m) => {
                error!(detail = %m, "storage unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "storage_unavailable",
                    "Storage unavailable, order not created",
                )
            }
            AppError::Internal(m) => {
                error!(detail = %m, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
            skipped: Vec::new(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::TokenError(e) => AppError::Internal(e.to_string()),
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::DbError(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<GuardError> for AppError {
    fn from(e: GuardError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NoValidItems { skipped } => AppError::RejectedOrder {
                message: format!(
                    "Transaction has 0 valid items ({} skipped). Transaction not created.",
                    skipped.len()
                ),
                skipped: skipped.into_iter().map(Into::into).collect(),
            },
            OrderError::Storage(StorageError::StockUnavailable { menu_id }) => {
                AppError::Validation(format!(
                    "Stock for menu {menu_id} ran out. Transaction not created."
                ))
            }
            OrderError::Storage(e @ StorageError::Timeout(_)) => {
                AppError::StorageUnavailable(e.to_string())
            }
            OrderError::Storage(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use warung_core::auth::jwt::TokenError;
    use warung_core::models::order::{SkipReason, SkippedItem};

    use super::*;

    #[test]
    fn guard_errors_are_unauthorized_without_detail() {
        let expired = AppError::from(GuardError::Invalid(TokenError::Expired));
        let forged = AppError::from(GuardError::Invalid(TokenError::InvalidSignature));
        assert_eq!(expired.to_string(), forged.to_string());
        assert_eq!(
            expired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn no_valid_items_lists_every_skipped_line() {
        let err = AppError::from(OrderError::NoValidItems {
            skipped: vec![
                SkippedItem {
                    index: 0,
                    menu_id: "A".into(),
                    quantity: 10,
                    reason: SkipReason::InsufficientStock,
                },
                SkippedItem {
                    index: 1,
                    menu_id: "B".into(),
                    quantity: 1,
                    reason: SkipReason::MenuNotFound,
                },
            ],
        });

        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "rejected_order");
        assert_eq!(json["skipped"][0]["menuId"], "A");
        assert_eq!(json["skipped"][0]["reason"], "insufficient_stock");
        assert_eq!(json["skipped"][1]["index"], 1);
        assert_eq!(json["skipped"][1]["reason"], "menu_not_found");
    }

    #[tokio::test]
    async fn plain_errors_have_no_skipped_field() {
        let resp = AppError::Validation("bad".into()).into_response();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("skipped").is_none());
    }

    #[test]
    fn storage_timeout_is_service_unavailable() {
        let err = AppError::from(OrderError::Storage(StorageError::Timeout(
            Duration::from_secs(1),
        )));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn missing_row_is_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
