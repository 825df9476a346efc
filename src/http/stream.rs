//! Continuous stream of capped records.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;

use super::{ApiError, AppState};

/// One JSON document per line, never-ending.
pub const APPLICATION_STREAM_JSON: &str = "application/stream+json";

/// `GET /streams/items`
///
/// Relays a tailable cursor as a chunked body. When the client goes away
/// axum drops the body, which drops the cursor and releases it.
pub(crate) async fn stream_items(State(state): State<AppState>) -> Result<Response, ApiError> {
    let cursor = state.capped.tail_all().await?;
    tracing::debug!("item stream opened");

    let lines = cursor.into_stream().map(|item| {
        serde_json::to_vec(&item).map(|mut line| {
            line.push(b'\n');
            Bytes::from(line)
        })
    });

    Ok((
        [(header::CONTENT_TYPE, APPLICATION_STREAM_JSON)],
        Body::from_stream(lines),
    )
        .into_response())
}
