use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;

use super::capped::CappedCollection;
use crate::document::ItemCapped;

/// Unbounded stream of capped records, as handed to transports.
pub type ItemStream = BoxStream<'static, ItemCapped>;

/// Keeps the repository's open-tail count honest. Decrements on drop.
struct TailRelease {
    open_tails: Arc<AtomicUsize>,
}

impl TailRelease {
    fn acquire(open_tails: Arc<AtomicUsize>) -> Self {
        let open = open_tails.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(open_tails = open, "tailable cursor opened");
        Self { open_tails }
    }
}

impl Drop for TailRelease {
    fn drop(&mut self) {
        let open = self.open_tails.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::debug!(open_tails = open, "tailable cursor released");
    }
}

/// Tailable read over a capped collection.
///
/// Yields every retained record in insertion order, then waits for new
/// ones. It never ends on its own: it ends only when [`close`] is called or
/// the collection is dropped. Dropping the cursor releases it as well, which
/// is what happens when an HTTP client disconnects mid-stream.
///
/// If the cursor falls behind eviction it resumes at the oldest record
/// still retained.
///
/// [`close`]: TailCursor::close
pub struct TailCursor {
    collection: Option<Arc<CappedCollection>>,
    head: watch::Receiver<u64>,
    last_seq: u64,
    pending: VecDeque<ItemCapped>,
    release: Option<TailRelease>,
}

impl TailCursor {
    pub(crate) fn open(collection: Arc<CappedCollection>, open_tails: Arc<AtomicUsize>) -> Self {
        let head = collection.subscribe();
        Self {
            collection: Some(collection),
            head,
            last_seq: 0,
            pending: VecDeque::new(),
            release: Some(TailRelease::acquire(open_tails)),
        }
    }

    /// Next record, waiting for one to be appended if necessary.
    ///
    /// Returns `None` once the cursor is closed or its collection dropped.
    /// Cancel-safe: dropping the future loses no records.
    pub async fn next(&mut self) -> Option<ItemCapped> {
        loop {
            if let Some(doc) = self.pending.pop_front() {
                return Some(doc);
            }

            let collection = self.collection.clone()?;
            if collection.is_dropped() {
                self.close();
                return None;
            }

            // Mark the head as seen before reading so an append racing with
            // the read still wakes the wait below.
            self.head.borrow_and_update();
            match collection.read_after(self.last_seq) {
                Ok(batch) if !batch.is_empty() => {
                    for (seq, doc) in batch {
                        self.last_seq = seq;
                        self.pending.push_back(doc);
                    }
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "tailable cursor read failed");
                    self.close();
                    return None;
                }
            }

            if self.head.changed().await.is_err() {
                self.close();
                return None;
            }
        }
    }

    /// Stop the cursor and release it. Idempotent.
    pub fn close(&mut self) {
        self.collection = None;
        self.pending.clear();
        self.release = None;
    }

    pub fn is_closed(&self) -> bool {
        self.collection.is_none()
    }

    /// Turn the cursor into a stream for a transport. The cursor is released
    /// when the stream is dropped.
    pub fn into_stream(self) -> ItemStream {
        stream::unfold(self, |mut cursor| async move {
            let doc = cursor.next().await?;
            Some((doc, cursor))
        })
        .boxed()
    }
}
