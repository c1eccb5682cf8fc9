//! Core type definitions for multilookup.
//!
//! This crate defines the store-agnostic types shared by the search, store and
//! engine crates:
//! - Record identifiers and entity references
//! - Target records, selected rows and relationship edges
//! - Entity metadata as reported by the remote store
//! - The immutable search strategy configuration
//!
//! Nothing here performs I/O.

mod config;
mod ids;
mod metadata;
mod record;

pub use config::{SearchMode, SearchStrategyConfig, WordMatch, parse_search_columns};
pub use ids::{EntityReference, RecordId};
pub use metadata::EntityMetadata;
pub use record::{RelationshipEdge, SelectedRow, TargetRecord, attribute_text};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid search mode: {0}")]
    InvalidSearchMode(String),

    #[error("invalid word match mode: {0}")]
    InvalidWordMatch(String),

    #[error("empty record id")]
    EmptyRecordId,
}
