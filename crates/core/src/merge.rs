//! Reconciliation merge -- combines a locally held record with a freshly
//! fetched remote one into the record that should be stored.
//!
//! Rules, applied in order:
//! 1. A terminal local record is returned unchanged. A late-arriving poll
//!    response for an operation that has already been stopped or completed
//!    must not resurrect or alter it.
//! 2. Otherwise the remote record is the new base; the service is
//!    authoritative for status, progress, logs, and result while the
//!    operation is live.
//! 3. A result/password the local record has already observed is carried
//!    forward when the remote response dropped it, so a transient partial
//!    response cannot erase a previously observed success.
//! 4. Timestamps never move backward.
//!
//! Pure and deterministic: callers are responsible for reading the local
//! record at write time, not at fetch-issue time.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::record::{Attack, CrackingJob};

/// Merge a fetched attack into the locally held one.
pub fn reconcile_attack(local: &Attack, remote: Attack) -> Attack {
    if local.status.is_terminal() {
        return local.clone();
    }
    let mut merged = remote;
    if merged.result.is_none() && local.result.is_some() {
        merged.result = local.result.clone();
    }
    merged.started_at = forward_required(&local.started_at, merged.started_at);
    merged.completed_at = forward(local.completed_at.as_deref(), merged.completed_at);
    merged
}

/// Merge a fetched cracking job into the locally held one.
pub fn reconcile_job(local: &CrackingJob, remote: CrackingJob) -> CrackingJob {
    if local.status.is_terminal() {
        return local.clone();
    }
    let mut merged = remote;
    if merged.password.is_none() && local.password.is_some() {
        merged.password = local.password.clone();
    }
    merged.created_at = forward_required(&local.created_at, merged.created_at);
    merged.started_at = forward(local.started_at.as_deref(), merged.started_at);
    merged.completed_at = forward(local.completed_at.as_deref(), merged.completed_at);
    merged
}

/// Pick the later of two optional RFC 3339 timestamps, never dropping a
/// held value. An unparsable incoming value loses to a parsable held one.
fn forward(held: Option<&str>, incoming: Option<String>) -> Option<String> {
    match (held, incoming) {
        (None, incoming) => incoming,
        (Some(held), None) => Some(held.to_string()),
        (Some(held), Some(incoming)) => Some(forward_required(held, incoming)),
    }
}

fn forward_required(held: &str, incoming: String) -> String {
    match (parse(held), parse(&incoming)) {
        (Ok(held_at), Ok(incoming_at)) if incoming_at < held_at => held.to_string(),
        (Ok(_), Err(_)) => held.to_string(),
        _ => incoming,
    }
}

fn parse(ts: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(ts, &Rfc3339)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
