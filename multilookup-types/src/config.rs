//! Search strategy configuration.
//!
//! A [`SearchStrategyConfig`] is built once the target collection's metadata
//! is known and is never mutated afterwards. A configuration change produces
//! a new value and a new strategy.

use crate::Error;
use crate::metadata::EntityMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which search strategy a control uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Load once, filter locally.
    #[default]
    Simple,
    /// Remote full-text search.
    Advanced,
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" | "0" => Ok(Self::Simple),
            "advanced" | "1" => Ok(Self::Advanced),
            other => Err(Error::InvalidSearchMode(other.to_string())),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Advanced => f.write_str("advanced"),
        }
    }
}

/// Whether a full-text query requires all terms or any term to match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordMatch {
    #[default]
    All,
    Any,
}

impl FromStr for WordMatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "any" => Ok(Self::Any),
            other => Err(Error::InvalidWordMatch(other.to_string())),
        }
    }
}

impl fmt::Display for WordMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Any => f.write_str("any"),
        }
    }
}

/// Immutable per-control search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStrategyConfig {
    /// Logical name of the target collection.
    pub collection: String,
    /// Attribute used as the record label.
    pub display_attribute: String,
    pub filter: Option<String>,
    pub order: Option<String>,
    /// Full-text columns; empty means the store's defaults.
    pub search_columns: Vec<String>,
    pub best_effort: bool,
    pub word_match: WordMatch,
}

impl SearchStrategyConfig {
    /// Creates a configuration with no filter, order or search columns.
    pub fn new(collection: impl Into<String>, display_attribute: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            display_attribute: display_attribute.into(),
            filter: None,
            order: None,
            search_columns: Vec::new(),
            best_effort: false,
            word_match: WordMatch::All,
        }
    }

    /// Creates a configuration from resolved metadata.
    pub fn from_metadata(metadata: &EntityMetadata) -> Self {
        Self::new(
            metadata.logical_name.clone(),
            metadata.primary_name_attribute.clone(),
        )
    }

    /// Sets the static filter. Blank filters are treated as absent.
    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = non_blank(filter);
        self
    }

    /// Sets the static order. Blank orders are treated as absent.
    #[must_use]
    pub fn with_order(mut self, order: Option<String>) -> Self {
        self.order = non_blank(order);
        self
    }

    #[must_use]
    pub fn with_search_columns(mut self, columns: Vec<String>) -> Self {
        self.search_columns = columns;
        self
    }

    #[must_use]
    pub fn with_best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    #[must_use]
    pub fn with_word_match(mut self, word_match: WordMatch) -> Self {
        self.word_match = word_match;
        self
    }

    /// Name of the primary key attribute, `<collection>id`.
    pub fn id_attribute(&self) -> String {
        format!("{}id", self.collection)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated column setting. Blank entries are dropped.
pub fn parse_search_columns(setting: &str) -> Vec<String> {
    setting
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
