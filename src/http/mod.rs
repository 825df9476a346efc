//! HTTP transport for the item service. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /items`: every item, insertion order.
//! - `GET /items/:id`: one item, or 404 with an empty body.
//! - `POST /items`: create; 201 with the stored item.
//! - `PUT /items/:id`: replace description and price; 404 if absent.
//! - `DELETE /items/:id`: idempotent delete; always 200.
//! - `GET /items/runtimeException`: always fails; exercises fault rendering.
//!   `PUT`/`DELETE` on that path behave as for any other id.
//! - `GET /streams/items`: newline-delimited JSON stream from the capped collection.
//! - `GET /health`: `{ "ok": true }`.
//!
//! ## Example
//!
//! ```ignore
//! let state = AppState::new(items, capped);
//! http::serve(http::router(state), "0.0.0.0:8080").await?;
//! ```

mod error;
mod fault;
mod items;
mod stream;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::lock::{InMemoryLockManager, LockManager};
use crate::repository::{
    CappedItemRepository, InMemoryCappedRepository, InMemoryItemRepository, ItemRepository,
};

pub use error::ApiError;
pub use fault::{ErrorBody, Fault, RequestId, REQUEST_ID_HEADER};
pub use stream::APPLICATION_STREAM_JSON;

pub const ITEM_END_POINT: &str = "/items";
pub const ITEM_STREAM_END_POINT: &str = "/streams/items";

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    items: Arc<dyn ItemRepository>,
    capped: Arc<dyn CappedItemRepository>,
    locks: Arc<dyn LockManager>,
}

impl AppState {
    pub fn new(items: Arc<dyn ItemRepository>, capped: Arc<dyn CappedItemRepository>) -> Self {
        Self {
            items,
            capped,
            locks: Arc::new(InMemoryLockManager::new()),
        }
    }

    /// State over fresh in-memory collections (capped collection not yet created).
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryItemRepository::new()),
            Arc::new(InMemoryCappedRepository::new()),
        )
    }

    pub fn with_locks(mut self, locks: Arc<dyn LockManager>) -> Self {
        self.locks = locks;
        self
    }

    pub fn items(&self) -> &Arc<dyn ItemRepository> {
        &self.items
    }

    pub fn capped(&self) -> &Arc<dyn CappedItemRepository> {
        &self.capped
    }
}

/// Build the service `Router`.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health_handler))
        .route(
            ITEM_END_POINT,
            get(items::list_items).post(items::create_item),
        )
        .route(
            "/items/runtimeException",
            get(items::runtime_exception)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route(ITEM_STREAM_END_POINT, get(stream::stream_items))
        .with_state(state);
    with_fault_handling(routes)
}

/// Wrap a router with the default fault mapper, request ids and request tracing.
///
/// Handler errors and panics come out as a JSON [`ErrorBody`].
pub fn with_fault_handling(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(fault::panic_response))
        .layer(axum::middleware::from_fn(fault::render_faults))
        .layer(axum::middleware::from_fn(fault::assign_request_id))
        .layer(TraceLayer::new_for_http())
}

/// Serve a router at the given address (e.g. `"0.0.0.0:8080"`) until Ctrl-C.
pub async fn serve(app: Router, addr: &str) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// `GET /health`
async fn health_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}
