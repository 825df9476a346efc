use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{KeyGuard, LockError, LockManager};

/// In-memory lock manager backed by a `HashMap<String, Arc<tokio::sync::Mutex<()>>>`.
///
/// Lazily creates one mutex per key. Entries nobody holds or waits on are
/// pruned on the next acquire so the table does not grow with every id ever
/// updated.
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    fn get_lock(&self, key: &str) -> Result<Arc<tokio::sync::Mutex<()>>, LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
        locks.retain(|k, lock| k == key || Arc::strong_count(lock) > 1);
        Ok(locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone())
    }
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LockManager for InMemoryLockManager {
    async fn acquire(&self, key: &str) -> Result<KeyGuard, LockError> {
        let lock = self.get_lock(key)?;
        let guard = lock.lock_owned().await;
        Ok(KeyGuard::new(key.to_string(), guard))
    }
}
