//! Lifecycle controller -- sequences commands and commits their results.
//!
//! `launch` is exactly two remote calls: create, then start. A start
//! failure is surfaced but the created record stays in the store in its
//! post-create status; there is no rollback and no retry. `terminate`
//! guards on the stoppable set locally before any remote call.

use std::sync::Arc;

use rfops_client::{ClientError, CommandClient};
use rfops_core::{Operation, ValidationError};

use crate::store::{OperationStore, StoreError};

/// Failures surfaced to the caller of `launch`/`terminate`.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// The record's current status does not accept a stop command.
    #[error("cannot stop {kind} '{id}' from status '{status}'")]
    InvalidState {
        kind: &'static str,
        id: String,
        status: &'static str,
    },

    /// The id is not in the store at all.
    #[error("{kind} '{id}' is not tracked")]
    Untracked { kind: &'static str, id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates create→start and user-initiated stop for one operation
/// kind, committing every command response to the store by full-record
/// replacement.
pub struct LifecycleController<O: Operation, C: CommandClient<O>> {
    store: Arc<OperationStore<O>>,
    client: Arc<C>,
}

impl<O: Operation, C: CommandClient<O>> Clone for LifecycleController<O, C> {
    fn clone(&self) -> Self {
        LifecycleController {
            store: Arc::clone(&self.store),
            client: Arc::clone(&self.client),
        }
    }
}

impl<O: Operation, C: CommandClient<O>> LifecycleController<O, C> {
    pub fn new(store: Arc<OperationStore<O>>, client: Arc<C>) -> Self {
        LifecycleController { store, client }
    }

    pub fn store(&self) -> &Arc<OperationStore<O>> {
        &self.store
    }

    /// Create and immediately start an operation.
    ///
    /// Validates the config locally first; a validation failure never
    /// reaches the service. If `create` succeeds but `start` fails, the
    /// record remains tracked in its post-create status and the start
    /// failure is returned.
    pub async fn launch(&self, config: O::Config) -> Result<O, LifecycleError> {
        O::validate(&config)?;

        let created = self.client.create(&config).await?;
        self.store.add(created.clone())?;

        let started = self.client.start(created.id()).await?;
        self.store.update(started.id(), started.clone())?;
        Ok(started)
    }

    /// Stop a live operation.
    ///
    /// A record outside the stoppable set is rejected locally with
    /// `InvalidState`; no remote call is made. The stop response is
    /// committed unconditionally -- the service's answer to a stop is
    /// authoritative.
    pub async fn terminate(&self, id: &str) -> Result<O, LifecycleError> {
        let record = self.store.get(id).ok_or_else(|| LifecycleError::Untracked {
            kind: O::KIND,
            id: id.to_string(),
        })?;
        if !record.is_stoppable() {
            return Err(LifecycleError::InvalidState {
                kind: O::KIND,
                id: id.to_string(),
                status: record.status_name(),
            });
        }

        let stopped = self.client.stop(id).await?;
        self.store.update(id, stopped.clone())?;
        Ok(stopped)
    }

    /// Dismiss a record from the store. Purely local.
    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.store.remove(id)
    }

    /// Read access for the presentation layer.
    pub fn list(&self) -> Vec<O> {
        self.store.list()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
