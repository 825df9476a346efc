//! Default fault mapper and request ids.
//!
//! A failing handler (or a panic) yields a response carrying a [`Fault`]
//! extension. [`render_faults`] replaces its body with:
//!
//! ```json
//! {
//!   "timestamp": "2024-05-27T14:42:10.495Z",
//!   "path": "/items/runtimeException",
//!   "status": 500,
//!   "error": "Internal Server Error",
//!   "message": "RuntimeException Occurred",
//!   "requestId": "f834bd99"
//! }
//! ```

use std::any::Any;

use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fault text attached to a response as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault(pub String);

/// Short correlation id assigned to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn generate() -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(8);
        RequestId(id)
    }
}

/// JSON body of a fault response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub timestamp: String,
    pub path: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub request_id: String,
}

pub(crate) async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let id = RequestId::generate();
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id.0) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

pub(crate) async fn render_faults(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let response = next.run(request).await;
    let Some(Fault(message)) = response.extensions().get::<Fault>().cloned() else {
        return response;
    };

    let status = response.status();
    tracing::error!(%path, status = status.as_u16(), request_id = %request_id, %message, "request failed");

    let body = ErrorBody {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        path,
        status: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Unknown").to_string(),
        message,
        request_id,
    };
    (status, Json(body)).into_response()
}

/// Panic hook for `CatchPanicLayer`: the panic payload becomes the fault message.
pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(Fault(message));
    response
}
