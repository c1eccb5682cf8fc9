//! Remote full-text search.
//!
//! The pre-query list comes from a composed [`SimpleSearchStrategy`] over the
//! same configuration. Queries go to the store's `searchquery` action.

use crate::simple::SimpleSearchStrategy;
use crate::strategy::SearchStrategy;
use async_trait::async_trait;
use multilookup_store::{
    RemoteStoreClient, SearchEntity, SearchOptions, SearchQueryRequest, StoreRequest, StoreResult,
    decode_search_response,
};
use multilookup_types::{SearchMode, SearchStrategyConfig, TargetRecord};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AdvancedSearchStrategy {
    client: Arc<dyn RemoteStoreClient>,
    config: Arc<SearchStrategyConfig>,
    simple: SimpleSearchStrategy,
}

impl AdvancedSearchStrategy {
    pub fn new(client: Arc<dyn RemoteStoreClient>, config: Arc<SearchStrategyConfig>) -> Self {
        let simple = SimpleSearchStrategy::new(Arc::clone(&client), Arc::clone(&config));
        Self {
            client,
            config,
            simple,
        }
    }

    /// Builds the full-text request for `query`.
    pub fn build_request(&self, query: &str) -> StoreResult<SearchQueryRequest> {
        let config = &self.config;
        let entity = SearchEntity {
            name: config.collection.clone(),
            select_columns: vec![config.display_attribute.clone()],
            search_columns: (!config.search_columns.is_empty())
                .then(|| config.search_columns.clone()),
            filter: config.filter.clone(),
        };
        let options = SearchOptions {
            best_effort_search_enabled: config.best_effort,
            search_mode: config.word_match,
        };
        let orderby = config.order.clone().map(|order| vec![order]);

        SearchQueryRequest::new(
            query,
            &[entity],
            Some(&options),
            orderby.as_deref(),
            true,
        )
    }

    async fn try_search(&self, query: &str) -> StoreResult<Vec<TargetRecord>> {
        let request = StoreRequest::from(self.build_request(query)?);
        let response = self.client.execute(&request).await?;
        let page = decode_search_response(&response)?;

        let total = page.value.len();
        let records: Vec<TargetRecord> = page
            .value
            .into_iter()
            .filter_map(|item| {
                TargetRecord::from_attributes(
                    &self.config.collection,
                    &self.config.display_attribute,
                    item.attributes,
                    item.id.as_deref(),
                )
            })
            .collect();
        if records.len() < total {
            warn!("Dropped {} search hit(s) without an id", total - records.len());
        }
        Ok(records)
    }
}

#[async_trait]
impl SearchStrategy for AdvancedSearchStrategy {
    fn mode(&self) -> SearchMode {
        SearchMode::Advanced
    }

    fn config(&self) -> &SearchStrategyConfig {
        &self.config
    }

    async fn initial_results(&self) -> Vec<TargetRecord> {
        self.simple.initial_results().await
    }

    async fn search(&self, query: &str) -> Vec<TargetRecord> {
        match self.try_search(query).await {
            Ok(records) => {
                debug!("Full-text search returned {} record(s)", records.len());
                records
            }
            Err(e) => {
                warn!("Search query failed: {e}");
                Vec::new()
            }
        }
    }
}
