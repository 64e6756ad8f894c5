//! whinv-server library - inventory HTTP API
//!
//! Exposes the router and state so integration tests can drive the API
//! without binding a socket.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
///
/// The pool is the only shared state; the database serializes writes.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let items = Router::new()
        .route("/items", get(api::list_items).post(api::create_item))
        .route(
            "/items/:id",
            get(api::get_item)
                .put(api::update_item)
                .delete(api::delete_item),
        )
        .route("/stats", get(api::get_stats));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    Router::new()
        .merge(items)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
