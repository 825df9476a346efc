use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{CappedItemRepository, TailCursor};
use crate::document::{new_object_id, Document, ItemCapped};
use crate::error::RepositoryError;

/// Bounds of a capped collection. Whichever bound is hit first triggers
/// eviction of the oldest records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CappedOptions {
    pub max_documents: usize,
    pub max_bytes: usize,
}

impl CappedOptions {
    pub fn new(max_documents: usize, max_bytes: usize) -> Self {
        Self {
            max_documents,
            max_bytes,
        }
    }
}

impl Default for CappedOptions {
    fn default() -> Self {
        Self::new(20, 50_000)
    }
}

struct Stored {
    seq: u64,
    size: usize,
    doc: ItemCapped,
}

struct CappedState {
    docs: VecDeque<Stored>,
    bytes: usize,
    next_seq: u64,
}

/// One live capped collection. Replaced wholesale on drop/create.
pub(crate) struct CappedCollection {
    options: CappedOptions,
    state: RwLock<CappedState>,
    /// Sequence number of the newest record; tails wait on changes.
    head: watch::Sender<u64>,
    dropped: AtomicBool,
}

impl CappedCollection {
    fn new(options: CappedOptions) -> Self {
        let (head, _) = watch::channel(0);
        Self {
            options,
            state: RwLock::new(CappedState {
                docs: VecDeque::new(),
                bytes: 0,
                next_seq: 1,
            }),
            head,
            dropped: AtomicBool::new(false),
        }
    }

    fn insert(&self, mut doc: ItemCapped) -> Result<ItemCapped, RepositoryError> {
        if doc.id().is_none() {
            doc.set_id(new_object_id());
        }
        let size = serde_json::to_vec(&doc)?.len();
        if size > self.options.max_bytes {
            return Err(RepositoryError::DocumentTooLarge {
                collection: ItemCapped::COLLECTION,
                size,
                max: self.options.max_bytes,
            });
        }

        let seq = {
            let mut state = self
                .state
                .write()
                .map_err(|_| RepositoryError::LockPoisoned("capped write"))?;
            let seq = state.next_seq;
            state.next_seq += 1;
            state.docs.push_back(Stored {
                seq,
                size,
                doc: doc.clone(),
            });
            state.bytes += size;

            while state.docs.len() > self.options.max_documents
                || state.bytes > self.options.max_bytes
            {
                match state.docs.pop_front() {
                    Some(evicted) => state.bytes -= evicted.size,
                    None => break,
                }
            }
            seq
        };

        self.head.send_replace(seq);
        Ok(doc)
    }

    /// Retained records with a sequence number greater than `seq`, oldest first.
    pub(crate) fn read_after(&self, seq: u64) -> Result<Vec<(u64, ItemCapped)>, RepositoryError> {
        let state = self
            .state
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("capped read"))?;
        Ok(state
            .docs
            .iter()
            .filter(|s| s.seq > seq)
            .map(|s| (s.seq, s.doc.clone()))
            .collect())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.head.subscribe()
    }

    pub(crate) fn is_dropped(&self) -> bool {
        self.dropped.load(Ordering::Acquire)
    }

    fn mark_dropped(&self) {
        self.dropped.store(true, Ordering::Release);
        // Wake every tail so it observes the drop.
        self.head.send_modify(|_| {});
    }
}

/// In-memory capped collection with tailable reads. Clone-friendly via Arc.
///
/// The collection does not exist until [`create_collection`] is called;
/// inserting or tailing before that fails with `CollectionMissing`.
///
/// [`create_collection`]: CappedItemRepository::create_collection
#[derive(Clone, Default)]
pub struct InMemoryCappedRepository {
    collection: Arc<RwLock<Option<Arc<CappedCollection>>>>,
    open_tails: Arc<AtomicUsize>,
}

impl InMemoryCappedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tailable cursors that have not been closed or dropped.
    pub fn open_tails(&self) -> usize {
        self.open_tails.load(Ordering::Acquire)
    }

    /// Bounds of the current collection, if one exists.
    pub fn options(&self) -> Option<CappedOptions> {
        self.collection
            .read()
            .ok()
            .and_then(|c| c.as_ref().map(|c| c.options))
    }

    fn current(&self) -> Result<Arc<CappedCollection>, RepositoryError> {
        let collection = self
            .collection
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("capped read"))?;
        collection
            .clone()
            .ok_or(RepositoryError::CollectionMissing(ItemCapped::COLLECTION))
    }
}

#[async_trait]
impl CappedItemRepository for InMemoryCappedRepository {
    async fn create_collection(&self, options: CappedOptions) -> Result<(), RepositoryError> {
        let mut collection = self
            .collection
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("capped write"))?;
        if collection.is_some() {
            return Err(RepositoryError::CollectionExists(ItemCapped::COLLECTION));
        }
        *collection = Some(Arc::new(CappedCollection::new(options)));
        tracing::debug!(
            collection = ItemCapped::COLLECTION,
            max_documents = options.max_documents,
            max_bytes = options.max_bytes,
            "capped collection created"
        );
        Ok(())
    }

    async fn drop_collection(&self) -> Result<bool, RepositoryError> {
        let dropped = self
            .collection
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("capped write"))?
            .take();
        match dropped {
            Some(collection) => {
                collection.mark_dropped();
                tracing::debug!(collection = ItemCapped::COLLECTION, "capped collection dropped");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert(&self, item: ItemCapped) -> Result<ItemCapped, RepositoryError> {
        self.current()?.insert(item)
    }

    async fn find_all(&self) -> Result<Vec<ItemCapped>, RepositoryError> {
        Ok(self
            .current()?
            .read_after(0)?
            .into_iter()
            .map(|(_, doc)| doc)
            .collect())
    }

    async fn tail_all(&self) -> Result<TailCursor, RepositoryError> {
        let collection = self.current()?;
        Ok(TailCursor::open(collection, Arc::clone(&self.open_tails)))
    }
}
