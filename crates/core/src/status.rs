//! Status state machines for attacks and cracking jobs.
//!
//! Both machines are strictly forward-directed. Terminal statuses are
//! sticky: once a record reaches one, neither a command response nor a
//! poll merge may move it anywhere else (enforced in [`crate::merge`]).
//!
//! Attack:  pending → initializing → running → {success, failed,
//!          cancelled, timeout}
//! Job:     queued → provisioning → starting → running → {paused ⇄
//!          running} → {success, exhausted, failed, cancelled}

use serde::{Deserialize, Serialize};

/// Execution status of an over-the-air attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackStatus {
    Pending,
    Initializing,
    Running,
    Success,
    Failed,
    Cancelled,
    Timeout,
}

impl AttackStatus {
    /// Terminal statuses permit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AttackStatus::Success
                | AttackStatus::Failed
                | AttackStatus::Cancelled
                | AttackStatus::Timeout
        )
    }

    /// A stop command is only accepted from these statuses.
    pub fn is_stoppable(self) -> bool {
        matches!(self, AttackStatus::Initializing | AttackStatus::Running)
    }

    /// Wire name of the status, as the service reports it.
    pub fn name(self) -> &'static str {
        match self {
            AttackStatus::Pending => "pending",
            AttackStatus::Initializing => "initializing",
            AttackStatus::Running => "running",
            AttackStatus::Success => "success",
            AttackStatus::Failed => "failed",
            AttackStatus::Cancelled => "cancelled",
            AttackStatus::Timeout => "timeout",
        }
    }
}

/// Execution status of a password-cracking job.
///
/// `Paused` is the one non-terminal status reachable from `Running` that
/// can move back to `Running`; everything after it is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Provisioning,
    Starting,
    Running,
    Paused,
    Success,
    Exhausted,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Success | JobStatus::Exhausted | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    pub fn is_stoppable(self) -> bool {
        matches!(self, JobStatus::Provisioning | JobStatus::Running)
    }

    pub fn name(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Provisioning => "provisioning",
            JobStatus::Starting => "starting",
            JobStatus::Running => "running",
            JobStatus::Paused => "paused",
            JobStatus::Success => "success",
            JobStatus::Exhausted => "exhausted",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
