use crate::error::{EngineError, EngineResult};
use multilookup_search::DEFAULT_DEBOUNCE;
use multilookup_types::{EntityMetadata, EntityReference, SearchMode, SearchStrategyConfig, WordMatch};
use std::time::Duration;

/// Everything a lookup session needs besides the store client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSettings {
    /// The record owning the relationship.
    pub host: EntityReference,
    pub relationship: String,
    /// Logical name of the searched collection.
    pub target_entity: String,
    pub search_mode: SearchMode,
    pub filter: Option<String>,
    pub order: Option<String>,
    pub search_columns: Vec<String>,
    pub best_effort: bool,
    pub word_match: WordMatch,
    pub debounce: Duration,
}

impl LookupSettings {
    pub fn new(
        host: EntityReference,
        relationship: impl Into<String>,
        target_entity: impl Into<String>,
    ) -> Self {
        Self {
            host,
            relationship: relationship.into(),
            target_entity: target_entity.into(),
            search_mode: SearchMode::default(),
            filter: None,
            order: None,
            search_columns: Vec::new(),
            best_effort: false,
            word_match: WordMatch::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    #[must_use]
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: Option<String>) -> Self {
        self.order = order;
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

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Checks that the identifying fields are present.
    pub fn validate(&self) -> EngineResult<()> {
        if self.host.entity_type.trim().is_empty() {
            return Err(EngineError::InvalidSettings("host entity is empty".into()));
        }
        if self.host.id.as_str().trim().is_empty() {
            return Err(EngineError::InvalidSettings("host id is empty".into()));
        }
        if self.relationship.trim().is_empty() {
            return Err(EngineError::InvalidSettings("relationship is empty".into()));
        }
        if self.target_entity.trim().is_empty() {
            return Err(EngineError::InvalidSettings("target entity is empty".into()));
        }
        Ok(())
    }

    /// Strategy configuration for the target described by `metadata`.
    pub fn strategy_config(&self, metadata: &EntityMetadata) -> SearchStrategyConfig {
        SearchStrategyConfig::from_metadata(metadata)
            .with_filter(self.filter.clone())
            .with_order(self.order.clone())
            .with_search_columns(self.search_columns.clone())
            .with_best_effort(self.best_effort)
            .with_word_match(self.word_match)
    }
}
