/// All failures a command call can surface.
///
/// Timeouts are deliberately folded into `Connection`: the bounded 30s
/// request timeout is the only deadline, and a caller treats an expired
/// one the same as any other transport failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The service rejected the request as malformed (HTTP 400/422).
    #[error("request rejected by service: {message}")]
    Validation { message: String },

    /// The service does not know this operation id (HTTP 404).
    #[error("operation '{id}' not found on service")]
    NotFound { id: String },

    /// Transport failure, timeout, or an unexpected service response.
    #[error("connection error: {message}")]
    Connection { message: String },
}
