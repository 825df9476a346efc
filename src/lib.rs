//! Item CRUD service over HTTP, backed by document-store style repositories,
//! with a never-ending stream over a capped collection.
//!
//! - [`repository`]: storage traits and in-memory collections, including
//!   the capped collection and its [`TailCursor`].
//! - [`init`]: explicit startup: seed items, recreate the capped
//!   collection, start the [`CappedProducer`].
//! - `http`: axum routes for the service (feature `http`).
//! - `client`: reqwest client and its own proxy routes (feature `client`).

pub mod config;
pub mod document;
mod error;
pub mod init;
pub mod lock;
pub mod producer;
pub mod repository;
pub mod telemetry;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "client")]
pub mod client;

pub use config::{ClientConfig, ConfigError, ServiceConfig};
pub use document::{Document, Item, ItemCapped, ItemPayload};
pub use error::RepositoryError;
pub use init::{DataInitializer, InitError};
pub use producer::{CappedProducer, ProducerStats};
pub use repository::{
    CappedItemRepository, CappedOptions, InMemoryCappedRepository, InMemoryItemRepository,
    ItemRepository, ItemStream, TailCursor,
};
