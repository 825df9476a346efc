//! Background producer that keeps appending records to the capped collection.
//!
//! Each tick inserts `"Random Item {n}"` priced `100.0 + n`, starting at
//! `n = 0`. Open streams pick the records up through their tailable cursors.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::document::ItemCapped;
use crate::repository::CappedItemRepository;

/// Statistics from the producer task.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProducerStats {
    pub inserted: usize,
    pub failed: usize,
}

/// The record appended on tick `n`.
pub fn random_item(n: u64) -> ItemCapped {
    ItemCapped::new(format!("Random Item {n}"), 100.0 + n as f64)
}

/// A background task that appends one record per interval.
///
/// ```ignore
/// let producer = CappedProducer::spawn(capped.clone(), Duration::from_secs(1));
/// // ... serve requests ...
/// let stats = producer.stop().await;
/// ```
///
/// Dropping the handle signals the task to stop without waiting for it.
pub struct CappedProducer {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<ProducerStats>>,
}

impl CappedProducer {
    pub fn spawn(capped: Arc<dyn CappedItemRepository>, interval: Duration) -> Self {
        Self::spawn_limited(capped, interval, None)
    }

    /// Like [`spawn`](Self::spawn) but finishes after `limit` successful inserts.
    pub fn spawn_limited(
        capped: Arc<dyn CappedItemRepository>,
        interval: Duration,
        limit: Option<usize>,
    ) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut stats = ProducerStats::default();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut n: u64 = 0;

            loop {
                if limit.is_some_and(|limit| stats.inserted >= limit) {
                    break;
                }
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }

                match capped.insert(random_item(n)).await {
                    Ok(item) => {
                        tracing::info!(?item, "Inserted item");
                        stats.inserted += 1;
                    }
                    Err(err) => {
                        tracing::warn!(%err, "capped insert failed");
                        stats.failed += 1;
                    }
                }
                n += 1;
            }

            tracing::debug!(?stats, "capped producer stopped");
            stats
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Stop the producer and wait for it to finish. Returns stats.
    pub async fn stop(mut self) -> ProducerStats {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or_default(),
            None => ProducerStats::default(),
        }
    }

    /// Wait for a limited producer to finish on its own.
    pub async fn join(mut self) -> ProducerStats {
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or_default(),
            None => ProducerStats::default(),
        }
    }
}

impl Drop for CappedProducer {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}
