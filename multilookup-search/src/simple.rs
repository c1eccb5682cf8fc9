//! Local-filter search.
//!
//! Loads the (optionally filtered and ordered) target collection once and
//! answers every query from that cache with a case-insensitive substring
//! match on the display value.

use crate::strategy::SearchStrategy;
use async_trait::async_trait;
use multilookup_store::{QueryOptions, Record, RemoteStoreClient};
use multilookup_types::{SearchMode, SearchStrategyConfig, TargetRecord};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub struct SimpleSearchStrategy {
    client: Arc<dyn RemoteStoreClient>,
    config: Arc<SearchStrategyConfig>,
    /// `None` until `initial_results` has succeeded once.
    cache: RwLock<Option<Vec<TargetRecord>>>,
}

impl SimpleSearchStrategy {
    pub fn new(client: Arc<dyn RemoteStoreClient>, config: Arc<SearchStrategyConfig>) -> Self {
        Self {
            client,
            config,
            cache: RwLock::new(None),
        }
    }

    /// Options of the initial retrieval: display and id columns, plus the
    /// static filter and order.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::select([
            self.config.display_attribute.clone(),
            self.config.id_attribute(),
        ])
        .with_filter(self.config.filter.clone())
        .with_order_by(self.config.order.clone())
    }

    /// Number of cached records, or `None` before the first successful load.
    pub async fn cached_len(&self) -> Option<usize> {
        self.cache.read().await.as_ref().map(Vec::len)
    }

    fn to_records(&self, raw: Vec<Record>) -> Vec<TargetRecord> {
        let total = raw.len();
        let records: Vec<TargetRecord> = raw
            .into_iter()
            .filter_map(|attributes| {
                TargetRecord::from_attributes(
                    &self.config.collection,
                    &self.config.display_attribute,
                    attributes,
                    None,
                )
            })
            .collect();
        if records.len() < total {
            warn!(
                "Dropped {} {} record(s) without an id",
                total - records.len(),
                self.config.collection
            );
        }
        records
    }
}

#[async_trait]
impl SearchStrategy for SimpleSearchStrategy {
    fn mode(&self) -> SearchMode {
        SearchMode::Simple
    }

    fn config(&self) -> &SearchStrategyConfig {
        &self.config
    }

    async fn initial_results(&self) -> Vec<TargetRecord> {
        let options = self.query_options();
        match self
            .client
            .retrieve_multiple(&self.config.collection, &options)
            .await
        {
            Ok(raw) => {
                let records = self.to_records(raw);
                debug!(
                    "Loaded {} {} record(s)",
                    records.len(),
                    self.config.collection
                );
                *self.cache.write().await = Some(records.clone());
                records
            }
            Err(e) => {
                warn!("Initial load of {} failed: {e}", self.config.collection);
                Vec::new()
            }
        }
    }

    async fn search(&self, query: &str) -> Vec<TargetRecord> {
        let needle = query.to_lowercase();
        match self.cache.read().await.as_ref() {
            Some(records) => records
                .iter()
                .filter(|r| r.display_contains(&needle))
                .cloned()
                .collect(),
            None => {
                debug!("Search before initial load; returning no results");
                Vec::new()
            }
        }
    }
}
