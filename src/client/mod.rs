//! HTTP client for the item service.
//!
//! Every call comes in two styles:
//!
//! - *retrieve* (`items`, `item`, `create`, ...): returns the decoded body and
//!   turns any non-success status into [`ClientError::Status`].
//! - *exchange* (`exchange_items`, `exchange_item`, ...): returns the
//!   [`RawResponse`] (status, headers, body) and leaves interpretation to the
//!   caller.
//!
//! ```ignore
//! let client = ItemClient::new("http://localhost:8080");
//! let items = client.items().await?;
//!
//! let raw = client.exchange_runtime_exception().await?;
//! if raw.is_server_error() {
//!     eprintln!("{}", raw.text());
//! }
//! ```

mod http;

use axum::body::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::document::{Item, ItemCapped, ItemPayload};

pub use http::router;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            ClientError::Decode(_) => None,
        }
    }
}

/// Undecoded response, for callers that inspect the status themselves.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Stream of capped records read from `/streams/items`.
pub type CappedStream = BoxStream<'static, Result<ItemCapped, ClientError>>;

#[derive(Clone)]
pub struct ItemClient {
    http: reqwest::Client,
    base_url: String,
}

impl ItemClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn list_request(&self) -> RequestBuilder {
        self.http.get(self.url("/items"))
    }

    fn get_request(&self, id: &str) -> RequestBuilder {
        self.http.get(self.url(&format!("/items/{id}")))
    }

    fn create_request(&self, payload: &ItemPayload) -> RequestBuilder {
        self.http.post(self.url("/items")).json(payload)
    }

    fn update_request(&self, id: &str, payload: &ItemPayload) -> RequestBuilder {
        self.http.put(self.url(&format!("/items/{id}"))).json(payload)
    }

    fn delete_request(&self, id: &str) -> RequestBuilder {
        self.http.delete(self.url(&format!("/items/{id}")))
    }

    fn runtime_exception_request(&self) -> RequestBuilder {
        self.http.get(self.url("/items/runtimeException"))
    }

    async fn retrieve<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let raw = Self::exchange(request).await?;
        if !raw.is_success() {
            return Err(ClientError::Status {
                status: raw.status,
                body: raw.text(),
            });
        }
        raw.json()
    }

    async fn exchange(request: RequestBuilder) -> Result<RawResponse, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    pub async fn items(&self) -> Result<Vec<Item>, ClientError> {
        Self::retrieve(self.list_request()).await
    }

    pub async fn exchange_items(&self) -> Result<RawResponse, ClientError> {
        Self::exchange(self.list_request()).await
    }

    pub async fn item(&self, id: &str) -> Result<Item, ClientError> {
        Self::retrieve(self.get_request(id)).await
    }

    pub async fn exchange_item(&self, id: &str) -> Result<RawResponse, ClientError> {
        Self::exchange(self.get_request(id)).await
    }

    pub async fn create(&self, payload: &ItemPayload) -> Result<Item, ClientError> {
        Self::retrieve(self.create_request(payload)).await
    }

    pub async fn exchange_create(&self, payload: &ItemPayload) -> Result<RawResponse, ClientError> {
        Self::exchange(self.create_request(payload)).await
    }

    pub async fn update(&self, id: &str, payload: &ItemPayload) -> Result<Item, ClientError> {
        Self::retrieve(self.update_request(id, payload)).await
    }

    pub async fn exchange_update(
        &self,
        id: &str,
        payload: &ItemPayload,
    ) -> Result<RawResponse, ClientError> {
        Self::exchange(self.update_request(id, payload)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let raw = Self::exchange(self.delete_request(id)).await?;
        if !raw.is_success() {
            return Err(ClientError::Status {
                status: raw.status,
                body: raw.text(),
            });
        }
        Ok(())
    }

    pub async fn exchange_delete(&self, id: &str) -> Result<RawResponse, ClientError> {
        Self::exchange(self.delete_request(id)).await
    }

    /// Calls the fault endpoint; under normal operation this is always
    /// `Err(ClientError::Status { status: 500, .. })`.
    pub async fn runtime_exception(&self) -> Result<Vec<Item>, ClientError> {
        Self::retrieve(self.runtime_exception_request()).await
    }

    pub async fn exchange_runtime_exception(&self) -> Result<RawResponse, ClientError> {
        Self::exchange(self.runtime_exception_request()).await
    }

    /// Open `/streams/items` and decode it line by line.
    ///
    /// The stream ends when the server closes the connection; dropping it
    /// closes the connection from this side.
    pub async fn stream_items(&self) -> Result<CappedStream, ClientError> {
        let response = self.http.get(self.url("/streams/items")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let chunks = response.bytes_stream().boxed();
        let lines = stream::unfold(
            (chunks, Vec::<u8>::new()),
            |(mut chunks, mut buffer)| async move {
                loop {
                    if let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                        let line: Vec<u8> = buffer.drain(..=pos).collect();
                        let item = serde_json::from_slice::<ItemCapped>(&line[..pos])
                            .map_err(ClientError::from);
                        return Some((item, (chunks, buffer)));
                    }
                    match chunks.next().await {
                        Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                        Some(Err(err)) => return Some((Err(err.into()), (chunks, buffer))),
                        None => return None,
                    }
                }
            },
        );
        Ok(lines.boxed())
    }
}
