//! Command Client boundary for the rfops remote service.
//!
//! The remote service performs the actual scanning, capture attacks, GPU
//! provisioning, and cracking; this crate only turns create/start/stop/
//! fetch-status intents into single HTTP round trips and classifies their
//! failures. No retries happen here -- retry policy belongs to the caller
//! (the poll scheduler retries implicitly on its next tick).

mod error;
mod http;
mod traits;

pub use error::ClientError;
pub use http::{ApiClient, Health};
pub use traits::CommandClient;
