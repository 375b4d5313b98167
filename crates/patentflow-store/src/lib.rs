//! Storage boundary for the patentflow engine
//!
//! The engine never touches a global mutable store. It is handed explicit
//! repository interfaces — simple get/list/put operations keyed by id —
//! and one synchronization primitive: [`PatentStore::commit_transition`],
//! which compare-and-sets the patent's stage and appends the audit record
//! in a single atomic operation. At most one of two racing transition
//! attempts for the same patent can win; the loser observes a
//! [`StorageError::Conflict`] and backs off.
//!
//! [`InMemoryWorkflowStore`] is the deterministic reference adapter used in
//! tests. Production deployments should use a transactional backend for
//! source-of-truth data.

#![deny(unsafe_code)]

mod error;
mod memory;
mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryWorkflowStore;
pub use traits::{PatentStore, TransitionLog};
