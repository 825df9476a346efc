//! Error type for item handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::fault::Fault;
use crate::error::RepositoryError;
use crate::lock::LockError;

/// Handler failure. Every variant is a server fault; absence of a record is
/// a 404 response, not an error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Lock(#[from] LockError),
    /// A fault raised deliberately by a handler.
    #[error("{0}")]
    Fault(String),
}

impl ApiError {
    pub fn fault(message: impl Into<String>) -> Self {
        ApiError::Fault(message.into())
    }
}

impl IntoResponse for ApiError {
    /// The body is left empty; `render_faults` turns the attached [`Fault`]
    /// into the JSON error body once the request path and id are known.
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(Fault(self.to_string()));
        response
    }
}
