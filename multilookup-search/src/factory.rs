use crate::advanced::AdvancedSearchStrategy;
use crate::simple::SimpleSearchStrategy;
use crate::strategy::SearchStrategy;
use multilookup_store::RemoteStoreClient;
use multilookup_types::{SearchMode, SearchStrategyConfig};
use std::sync::Arc;
use tracing::debug;

/// Builds the strategy variant selected by `mode`.
///
/// The configuration is frozen inside the returned strategy; a configuration
/// change means building a new one.
pub fn build_strategy(
    client: Arc<dyn RemoteStoreClient>,
    config: SearchStrategyConfig,
    mode: SearchMode,
) -> Arc<dyn SearchStrategy> {
    debug!(
        "Building {mode} search strategy for {} (display: {})",
        config.collection, config.display_attribute
    );
    let config = Arc::new(config);
    match mode {
        SearchMode::Simple => Arc::new(SimpleSearchStrategy::new(client, config)),
        SearchMode::Advanced => Arc::new(AdvancedSearchStrategy::new(client, config)),
    }
}
