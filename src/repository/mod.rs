//! Storage-access interface for the item service.
//!
//! Handlers only see the two traits here. The in-memory implementations
//! stand in for a document store: one unbounded collection of [`Item`]s and
//! one capped collection of [`ItemCapped`] records that supports tailable
//! reads through [`TailCursor`].
//!
//! ```ignore
//! let items = InMemoryItemRepository::new();
//! let saved = items.save(Item::new("LG TV", 850.0)).await?;
//! assert!(saved.id.is_some());
//!
//! let capped = InMemoryCappedRepository::new();
//! capped.create_collection(CappedOptions::new(20, 50_000)).await?;
//! let mut cursor = capped.tail_all().await?;
//! capped.insert(ItemCapped::new("Random Item 0", 100.0)).await?;
//! assert_eq!(cursor.next().await.unwrap().description, "Random Item 0");
//! ```

mod capped;
mod cursor;
mod in_memory;

use async_trait::async_trait;

use crate::document::{Item, ItemCapped};
use crate::error::RepositoryError;

pub use capped::{CappedOptions, InMemoryCappedRepository};
pub use cursor::{ItemStream, TailCursor};
pub use in_memory::InMemoryItemRepository;

/// Async CRUD access to the item collection.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items in insertion order.
    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, RepositoryError>;

    /// First item (in insertion order) whose description matches exactly.
    async fn find_by_description(&self, description: &str)
        -> Result<Option<Item>, RepositoryError>;

    /// Insert or replace. Assigns an id when the item has none.
    async fn save(&self, item: Item) -> Result<Item, RepositoryError>;

    /// Remove by id. Removing an unknown id is not an error.
    async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError>;

    async fn delete_all(&self) -> Result<(), RepositoryError>;
}

/// Append-only access to the capped collection.
#[async_trait]
pub trait CappedItemRepository: Send + Sync {
    /// Create the collection with fixed bounds. Fails if it already exists.
    async fn create_collection(&self, options: CappedOptions) -> Result<(), RepositoryError>;

    /// Drop the collection and end every open tail on it.
    /// Returns whether a collection existed.
    async fn drop_collection(&self) -> Result<bool, RepositoryError>;

    /// Append a record, evicting the oldest ones if a bound is exceeded.
    async fn insert(&self, item: ItemCapped) -> Result<ItemCapped, RepositoryError>;

    /// Records currently retained, oldest first.
    async fn find_all(&self) -> Result<Vec<ItemCapped>, RepositoryError>;

    /// Open a tailable cursor positioned before the oldest retained record.
    async fn tail_all(&self) -> Result<TailCursor, RepositoryError>;
}
