//! rfops tracker -- the asynchronous operation lifecycle and
//! polling-reconciliation layer.
//!
//! Three pieces, all generic over [`rfops_core::Operation`]:
//!
//! - [`OperationStore`] -- in-memory collection of tracked records, the
//!   only shared mutable state in this layer.
//! - [`LifecycleController`] -- sequences create→start and user-initiated
//!   stop, committing each command response to the store.
//! - [`PollScheduler`] -- periodically re-synchronizes every live record
//!   with the authoritative service state, reconciling each response
//!   against the store's current record at write time.
//!
//! Concurrency model: cooperative. Commands and polls for the same id may
//! interleave at await points; the terminal-stickiness rule of the merge
//! (evaluated against the store's state at write time) is what keeps a
//! stale poll from undoing a stop or a completed result.

mod lifecycle;
mod scheduler;
mod store;

pub use lifecycle::{LifecycleController, LifecycleError};
pub use scheduler::{PollScheduler, ATTACK_POLL_INTERVAL, JOB_POLL_INTERVAL};
pub use store::{OperationStore, StoreError};
