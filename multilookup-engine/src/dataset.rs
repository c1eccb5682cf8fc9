//! The host's materialized view of a relationship.

use async_trait::async_trait;
use multilookup_store::{QueryOptions, RemoteStoreClient, StoreResult};
use multilookup_types::{EntityReference, SearchStrategyConfig, SelectedRow, TargetRecord};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Rows currently linked to the host record.
///
/// The reconciler only reads rows and triggers a reload; it never edits rows
/// directly. After a write batch the store is the source of truth.
#[async_trait]
pub trait RelationshipDataset: Send + Sync {
    /// Rows as of the last refresh, in store order.
    async fn rows(&self) -> Vec<SelectedRow>;

    /// Reloads rows from the store.
    async fn refresh(&self) -> StoreResult<()>;

    /// Display values of the current rows.
    async fn display_values(&self) -> Vec<String> {
        self.rows()
            .await
            .into_iter()
            .map(|row| row.display_value)
            .collect()
    }
}

/// A [`RelationshipDataset`] loaded through [`RemoteStoreClient::retrieve_related`].
pub struct StoreDataset {
    client: Arc<dyn RemoteStoreClient>,
    host: EntityReference,
    relationship: String,
    collection: String,
    display_attribute: String,
    rows: RwLock<Vec<SelectedRow>>,
}

impl StoreDataset {
    /// Creates an empty dataset. Call [`refresh`](RelationshipDataset::refresh)
    /// to load it.
    pub fn new(
        client: Arc<dyn RemoteStoreClient>,
        host: EntityReference,
        relationship: impl Into<String>,
        config: &SearchStrategyConfig,
    ) -> Self {
        Self {
            client,
            host,
            relationship: relationship.into(),
            collection: config.collection.clone(),
            display_attribute: config.display_attribute.clone(),
            rows: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RelationshipDataset for StoreDataset {
    async fn rows(&self) -> Vec<SelectedRow> {
        self.rows.read().await.clone()
    }

    async fn refresh(&self) -> StoreResult<()> {
        let options = QueryOptions::select([
            self.display_attribute.clone(),
            format!("{}id", self.collection),
        ]);
        let raw = self
            .client
            .retrieve_related(&self.host, &self.relationship, &options)
            .await?;

        let total = raw.len();
        let rows: Vec<SelectedRow> = raw
            .into_iter()
            .filter_map(|attributes| {
                TargetRecord::from_attributes(
                    &self.collection,
                    &self.display_attribute,
                    attributes,
                    None,
                )
            })
            .map(|record| SelectedRow::from(&record))
            .collect();
        if rows.len() < total {
            warn!("Dropped {} related row(s) without an id", total - rows.len());
        }

        debug!(
            "Loaded {} row(s) of {} for {}",
            rows.len(),
            self.relationship,
            self.host
        );
        *self.rows.write().await = rows;
        Ok(())
    }
}
