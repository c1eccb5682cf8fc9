//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("metadata error: {0}")]
    Metadata(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A request was built with invalid arguments.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true if the store reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_)) || self.status() == Some(404)
    }

    /// Returns the HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Status { status, .. } => Some(*status),
            StoreError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
