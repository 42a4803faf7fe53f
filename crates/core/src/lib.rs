//! rfops core -- data model for tracked wireless operations.
//!
//! A tracked operation is a long-running job executed by the remote
//! service: an over-the-air attack or a password-cracking job. This crate
//! owns the record types mirroring the service's wire contract, the status
//! state machines, local config validation, and the pure reconciliation
//! merge that combines a locally held record with a freshly fetched one.
//!
//! No I/O happens here; the HTTP boundary lives in `rfops-client` and the
//! store/scheduler machinery in `rfops-tracker`.

pub mod merge;
pub mod operation;
pub mod record;
pub mod status;

pub use operation::{Operation, ValidationError};
pub use record::{
    Attack, AttackConfig, AttackResult, AttackType, CrackMode, CrackingJob, CrackingJobConfig,
    CrackingProgress, GpuInstance, GpuProvider,
};
pub use status::{AttackStatus, JobStatus};
