use thiserror::Error;

/// Error type for store operations.
///
/// Absence of a record is never an error; lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("repository lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("collection {0} does not exist")]
    CollectionMissing(&'static str),
    #[error("collection {0} already exists")]
    CollectionExists(&'static str),
    #[error("document does not fit in capped collection {collection} ({size} bytes, max {max})")]
    DocumentTooLarge {
        collection: &'static str,
        size: usize,
        max: usize,
    },
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serde(err.to_string())
    }
}
