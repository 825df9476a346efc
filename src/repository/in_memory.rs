use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::ItemRepository;
use crate::document::{new_object_id, Document, Item};
use crate::error::RepositoryError;

struct Stored {
    seq: u64,
    item: Item,
}

#[derive(Default)]
struct Collection {
    docs: HashMap<String, Stored>,
    next_seq: u64,
}

/// HashMap-backed item collection. Clone-friendly via Arc.
///
/// Each document keeps the sequence number of its first insert, so listing
/// returns insertion order and replacing a document does not move it.
#[derive(Clone, Default)]
pub struct InMemoryItemRepository {
    storage: Arc<RwLock<Collection>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_sorted(&self) -> Result<Vec<Item>, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;
        let mut stored: Vec<&Stored> = storage.docs.values().collect();
        stored.sort_by_key(|s| s.seq);
        Ok(stored.into_iter().map(|s| s.item.clone()).collect())
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError> {
        self.read_sorted()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;
        Ok(storage.docs.get(id).map(|s| s.item.clone()))
    }

    async fn find_by_description(
        &self,
        description: &str,
    ) -> Result<Option<Item>, RepositoryError> {
        Ok(self
            .read_sorted()?
            .into_iter()
            .find(|item| item.description == description))
    }

    async fn save(&self, mut item: Item) -> Result<Item, RepositoryError> {
        let id = match item.id() {
            Some(id) => id.to_string(),
            None => {
                let id = new_object_id();
                item.set_id(id.clone());
                id
            }
        };

        let mut storage = self
            .storage
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;
        let existing = storage.docs.get(&id).map(|s| s.seq);
        let seq = match existing {
            Some(seq) => seq,
            None => {
                let seq = storage.next_seq;
                storage.next_seq += 1;
                seq
            }
        };
        storage.docs.insert(
            id,
            Stored {
                seq,
                item: item.clone(),
            },
        );
        tracing::trace!(collection = Item::COLLECTION, id = ?item.id, "saved");
        Ok(item)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;
        storage.docs.remove(id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), RepositoryError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;
        storage.docs.clear();
        Ok(())
    }
}
