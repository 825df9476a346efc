//! HTTP surface of the item client. Each route calls the item service and
//! relays the result.
//!
//! Upstream 404s come back as 404. Other upstream failures are faults:
//! 502 for the plain proxy routes, 500 for the two `/error` routes, which
//! exist to show how the upstream error body surfaces.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use super::{ClientError, ItemClient};
use crate::document::{Item, ItemPayload};
use crate::http::{with_fault_handling, Fault};

enum ProxyError {
    NotFound,
    Upstream(ClientError),
    Fault(String),
}

impl From<ClientError> for ProxyError {
    fn from(err: ClientError) -> Self {
        match err.status() {
            Some(StatusCode::NOT_FOUND) => ProxyError::NotFound,
            _ => ProxyError::Upstream(err),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ProxyError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            ProxyError::Upstream(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            ProxyError::Fault(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        let mut response = status.into_response();
        response.extensions_mut().insert(Fault(message));
        response
    }
}

/// Build the client `Router` around an [`ItemClient`].
pub fn router(client: ItemClient) -> Router {
    let routes = Router::new()
        .route("/client/retrieve", get(retrieve_items))
        .route("/client/exchange", get(exchange_items))
        .route("/client/retrieve/singleItem/:id", get(retrieve_item))
        .route("/client/exchange/singleItem/:id", get(exchange_item))
        .route("/client/createItem", post(create_item))
        .route("/client/updateItem/:id", put(update_item))
        .route("/client/deleteItem/:id", delete(delete_item))
        .route("/client/retrieve/error", get(retrieve_error))
        .route("/client/exchange/error", get(exchange_error))
        .with_state(client);
    with_fault_handling(routes)
}

async fn retrieve_items(State(client): State<ItemClient>) -> Result<Json<Vec<Item>>, ProxyError> {
    let items = client.items().await?;
    tracing::info!(count = items.len(), "Items in client call using retrieve");
    Ok(Json(items))
}

async fn exchange_items(State(client): State<ItemClient>) -> Result<Json<Vec<Item>>, ProxyError> {
    let raw = client.exchange_items().await?;
    tracing::info!(status = raw.status.as_u16(), "Items in client call using exchange");
    Ok(Json(raw.json().map_err(ProxyError::Upstream)?))
}

async fn retrieve_item(
    State(client): State<ItemClient>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ProxyError> {
    Ok(Json(client.item(&id).await?))
}

async fn exchange_item(
    State(client): State<ItemClient>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ProxyError> {
    let raw = client.exchange_item(&id).await?;
    if raw.status == StatusCode::NOT_FOUND {
        return Err(ProxyError::NotFound);
    }
    Ok(Json(raw.json().map_err(ProxyError::Upstream)?))
}

async fn create_item(
    State(client): State<ItemClient>,
    Json(payload): Json<ItemPayload>,
) -> Result<(StatusCode, Json<Item>), ProxyError> {
    let created = client.create(&payload).await?;
    tracing::info!(item = ?created, "Created item");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_item(
    State(client): State<ItemClient>,
    Path(id): Path<String>,
    Json(payload): Json<ItemPayload>,
) -> Result<Json<Item>, ProxyError> {
    let updated = client.update(&id, &payload).await?;
    tracing::info!(item = ?updated, "Updated item");
    Ok(Json(updated))
}

async fn delete_item(
    State(client): State<ItemClient>,
    Path(id): Path<String>,
) -> Result<StatusCode, ProxyError> {
    client.delete(&id).await?;
    tracing::info!(%id, "Deleted item");
    Ok(StatusCode::OK)
}

/// Fault endpoint via retrieve: the upstream error body becomes the message.
async fn retrieve_error(State(client): State<ItemClient>) -> Result<Json<Vec<Item>>, ProxyError> {
    match client.runtime_exception().await {
        Ok(items) => Ok(Json(items)),
        Err(ClientError::Status { status, body }) if status.is_server_error() => {
            tracing::error!(%body, "The error message is");
            Err(ProxyError::Fault(body))
        }
        Err(err) => Err(ProxyError::Upstream(err)),
    }
}

/// Fault endpoint via exchange: the status is inspected by hand.
async fn exchange_error(State(client): State<ItemClient>) -> Result<Json<Vec<Item>>, ProxyError> {
    let raw = client
        .exchange_runtime_exception()
        .await
        .map_err(ProxyError::Upstream)?;
    if raw.is_server_error() {
        let body = raw.text();
        tracing::error!(%body, "Error message");
        return Err(ProxyError::Fault(body));
    }
    Ok(Json(raw.json().map_err(ProxyError::Upstream)?))
}
