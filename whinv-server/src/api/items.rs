//! Item CRUD endpoints
//!
//! Responses carry the derived `status` and `variance` next to the stored
//! fields; both are computed per request from the quantities.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};
use whinv_common::db;
use whinv_common::{ItemFields, ItemView, StatusCounts};

use crate::{ApiError, ApiResult, AppState};

/// Query parameters for listing items
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring of name, position or details
    pub search: Option<String>,
}

/// GET /items?search=term
///
/// Returns items ordered by position. Absent or empty `search` returns the
/// whole collection.
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ItemView>>> {
    let items = db::list_items(&state.db, query.search.as_deref())
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch items"))?;

    debug!(
        "Listed {} items (search: {:?})",
        items.len(),
        query.search.as_deref().unwrap_or("")
    );

    Ok(Json(items.into_iter().map(ItemView::from).collect()))
}

/// GET /items/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemView>> {
    let item = db::get_item(&state.db, &id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch item"))?;

    Ok(Json(item.into()))
}

/// POST /items
///
/// **Request:** `{"name", "details", "position", "quantity", "plannedQuantity"?}`
///
/// **Errors:**
/// - 400 Bad Request: empty name/position or malformed body
/// - 500 Internal Server Error: database failure
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<ItemFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ItemView>)> {
    let Json(fields) = payload?;

    let item = db::create_item(&state.db, &fields)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create item"))?;

    info!("Created item {} '{}' at {}", item.id, item.name, item.position);

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// PUT /items/:id
///
/// Full replace of the mutable fields.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ItemFields>, JsonRejection>,
) -> ApiResult<Json<ItemView>> {
    let Json(fields) = payload?;

    let item = db::update_item(&state.db, &id, &fields)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update item"))?;

    info!("Updated item {} '{}' at {}", item.id, item.name, item.position);

    Ok(Json(item.into()))
}

/// DELETE /items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    db::delete_item(&state.db, &id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete item"))?;

    info!("Deleted item {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// GET /stats
///
/// Item counts per reconciliation status.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatusCounts>> {
    let items = db::list_items(&state.db, None)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch items"))?;

    Ok(Json(items.iter().map(|item| item.status()).collect()))
}
