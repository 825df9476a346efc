use thiserror::Error;

/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The lock table was poisoned (a thread panicked while holding it).
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}
