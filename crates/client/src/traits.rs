use async_trait::async_trait;
use rfops_core::Operation;

use crate::error::ClientError;

/// Command boundary for one tracked operation kind.
///
/// Every method is a single request/response round trip against the
/// remote service. Implementations must not retry; a failed call is
/// surfaced as-is and the caller decides what to do with it.
///
/// Generic over [`Operation`] so the lifecycle controller and poll
/// scheduler drive attacks and cracking jobs through the same code, and
/// so tests can substitute scripted in-memory clients.
#[async_trait]
pub trait CommandClient<O: Operation>: Send + Sync + 'static {
    /// Register a new operation with the service. The service assigns the id.
    async fn create(&self, config: &O::Config) -> Result<O, ClientError>;

    /// Begin executing a previously created operation.
    async fn start(&self, id: &str) -> Result<O, ClientError>;

    /// Ask the service to cancel a live operation.
    async fn stop(&self, id: &str) -> Result<O, ClientError>;

    /// Read the authoritative current record for an operation.
    async fn fetch_status(&self, id: &str) -> Result<O, ClientError>;
}
