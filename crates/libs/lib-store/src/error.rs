use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by the document store API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Conditional create hit an existing document
    #[error("document already exists")]
    AlreadyExists,

    /// Bearer token missing, expired, or rejected by the store's rules
    #[error("store rejected the credentials")]
    Unauthorized,

    /// Any other non-success status; carries the status and server message
    #[error("store error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the expected record shape
    #[error("malformed store response: {0}")]
    Decode(String),
}
