//! Per-key locks used to serialise read-modify-write cycles on one document.
//!
//! Handlers that update a record (`find_by_id` → mutate → `save`) take the
//! lock for that id first so two concurrent updates to the same id apply one
//! after the other instead of interleaving. Delete takes it too, so an update
//! never writes back a record deleted mid-cycle. Different ids never contend.

mod error;
mod in_memory;
mod lock_manager;

pub use error::LockError;
pub use in_memory::InMemoryLockManager;
pub use lock_manager::{KeyGuard, LockManager};
