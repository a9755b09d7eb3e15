//! Sync errors
//!
//! Every request resolves to a `SyncResult`, so callers can tell a stored
//! mutation from a failed one and keep their forms open on failure.

use crate::transport::Resource;

/// Common result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// The request never produced a response
    #[error("network error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{resource} #{id} not found")]
    NotFound { resource: Resource, id: u32 },

    /// A client-side invariant was violated before anything was sent
    #[error("{0}")]
    Validation(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound { .. } | SyncError::Status { status: 404, .. })
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(err.to_string())
    }
}
