use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::LockError;

/// Held lock for one key. Released on drop.
pub struct KeyGuard {
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl KeyGuard {
    pub(crate) fn new(key: String, guard: OwnedMutexGuard<()>) -> Self {
        Self { key, _guard: guard }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Factory for per-key locks.
///
/// Repeated calls with the same key must contend on the same logical lock.
/// The default `InMemoryLockManager` keeps a table of async mutexes; a
/// multi-process deployment would back this with the store instead.
#[async_trait]
pub trait LockManager: Send + Sync {
    /// Wait until the lock for `key` is free, then hold it until the guard drops.
    async fn acquire(&self, key: &str) -> Result<KeyGuard, LockError>;
}
