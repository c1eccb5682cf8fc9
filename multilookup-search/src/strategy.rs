//! The search strategy contract.

use async_trait::async_trait;
use multilookup_types::{SearchMode, SearchStrategyConfig, TargetRecord};

/// Turns query text into candidate records.
///
/// Neither operation fails the caller: remote errors are logged and yield an
/// empty result. Ordering is whatever the configured order expression asks
/// for, otherwise store-defined.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// Which variant this is.
    fn mode(&self) -> SearchMode;

    /// The configuration this strategy was built with.
    fn config(&self) -> &SearchStrategyConfig;

    /// Candidates shown before the user types anything.
    async fn initial_results(&self) -> Vec<TargetRecord>;

    /// Candidates matching `query`.
    async fn search(&self, query: &str) -> Vec<TargetRecord>;
}
