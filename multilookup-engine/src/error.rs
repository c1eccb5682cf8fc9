//! Error types for the engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while setting up a lookup session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Settings are incomplete or inconsistent.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("store error: {0}")]
    Store(#[from] multilookup_store::StoreError),
}
