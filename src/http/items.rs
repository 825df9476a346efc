//! Item CRUD handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{ApiError, AppState};
use crate::document::{Item, ItemPayload};

/// `GET /items`
pub(crate) async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.items.find_all().await?))
}

/// `GET /items/:id`: 404 with no body when absent.
pub(crate) async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(match state.items.find_by_id(&id).await? {
        Some(item) => Json(item).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// `POST /items`
pub(crate) async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemPayload>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let saved = state.items.save(Item::from(payload)).await?;
    tracing::debug!(id = ?saved.id, "item created");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// `PUT /items/:id`: replaces description and price only.
///
/// The read-modify-write runs under the per-id lock, so concurrent updates
/// to one id apply in turn (last write wins, nothing is lost mid-cycle).
/// An unknown id is a 404 and nothing is created.
pub(crate) async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ItemPayload>,
) -> Result<Response, ApiError> {
    let _guard = state.locks.acquire(&id).await?;

    let Some(mut current) = state.items.find_by_id(&id).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    current.apply(&payload);
    let saved = state.items.save(current).await?;
    tracing::debug!(%id, "item updated");
    Ok(Json(saved).into_response())
}

/// `DELETE /items/:id`: 200 whether or not the item existed.
///
/// Takes the same per-id lock as update so an in-flight update cannot
/// write the record back after it is gone.
pub(crate) async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.locks.acquire(&id).await?;
    state.items.delete_by_id(&id).await?;
    tracing::debug!(%id, "item deleted");
    Ok(StatusCode::OK)
}

/// `GET /items/runtimeException`: reads every item, then fails.
pub(crate) async fn runtime_exception(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.items.find_all().await?;
    tracing::debug!(count = items.len(), "items read before injected fault");
    Err(ApiError::fault("RuntimeException Occurred"))
}
