//! # warung_api
//!
//! HTTP API library for Warung Makan.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use warung_core::auth::jwt::TokenCodec;
use warung_core::orders::postgres::{PgMenuLookup, PgOrderStore};
use warung_core::orders::service::OrderService;

use crate::config::ApiConfig;
use crate::handlers::{auth, health, menus, transactions, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
    /// Token codec built once from `config.token`.
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(pool: PgPool, config: ApiConfig) -> Self {
        let tokens = Arc::new(TokenCodec::new(config.token.clone()));
        Self {
            pool,
            config,
            tokens,
        }
    }

    /// Order service over this state's pool.
    pub fn order_service(&self) -> OrderService<PgMenuLookup, PgOrderStore> {
        OrderService::new(
            PgMenuLookup::new(self.pool.clone()),
            PgOrderStore::new(self.pool.clone()),
        )
        .with_timeout(self.config.storage_timeout)
    }
}

/// Run embedded database migrations.
///
/// Delegates to `warung_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    warung_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/", get(health::health_handler))
        .route("/login", post(auth::login_handler))
        .route("/register", post(auth::register_handler))
        .route("/menu", get(menus::list_menus_handler))
        .route("/menu/{id}", get(menus::get_menu_handler))
        .route("/user", get(users::list_users_handler))
        .route("/user/{id}", get(users::get_user_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route("/me", get(auth::me_handler))
        .route("/menu", post(menus::create_menu_handler))
        .route(
            "/menu/{id}",
            put(menus::update_menu_handler).delete(menus::delete_menu_handler),
        )
        .route(
            "/user/{id}",
            put(users::update_user_handler).delete(users::delete_user_handler),
        )
        .route(
            "/transaction",
            get(transactions::list_transactions_handler)
                .post(transactions::create_transaction_handler),
        )
        .route(
            "/transaction/{id}",
            get(transactions::get_transaction_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
