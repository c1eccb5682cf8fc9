//! One lookup control's state: metadata, strategy, options, selection.
//!
//! Simple mode searches on every input. Advanced mode routes input through a
//! [`DebounceGate`] and only queries the store for a non-empty settled term.

use crate::dataset::{RelationshipDataset, StoreDataset};
use crate::error::EngineResult;
use crate::reconciler::{ReconcileReport, SelectionReconciler};
use crate::settings::LookupSettings;
use multilookup_search::{DebounceGate, Debounced, SearchStrategy, build_strategy};
use multilookup_store::RemoteStoreClient;
use multilookup_types::{EntityMetadata, RecordId, SearchMode, TargetRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct LookupSession {
    client: Arc<dyn RemoteStoreClient>,
    settings: LookupSettings,
    metadata: Option<EntityMetadata>,
    /// `None` until metadata is known.
    strategy: Option<Arc<dyn SearchStrategy>>,
    dataset: Option<Arc<dyn RelationshipDataset>>,
    reconciler: SelectionReconciler,
    options: Vec<TargetRecord>,
    gate: DebounceGate<String>,
    settled: Debounced<String>,
}

impl LookupSession {
    /// Opens a session, resolving target metadata.
    ///
    /// A metadata failure is not an error: the session opens without a
    /// strategy or dataset, and searches return nothing.
    pub async fn open(
        client: Arc<dyn RemoteStoreClient>,
        settings: LookupSettings,
    ) -> EngineResult<Self> {
        settings.validate()?;
        let metadata = fetch_metadata(client.as_ref(), &settings.target_entity).await;
        let (gate, settled) = DebounceGate::new(settings.debounce);
        let reconciler = reconciler_for(&client, &settings);

        let mut session = Self {
            client,
            settings,
            metadata: None,
            strategy: None,
            dataset: None,
            reconciler,
            options: Vec::new(),
            gate,
            settled,
        };
        session.install(metadata);
        Ok(session)
    }

    /// Replaces the relationship dataset.
    #[must_use]
    pub fn with_dataset(mut self, dataset: Arc<dyn RelationshipDataset>) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    pub fn metadata(&self) -> Option<&EntityMetadata> {
        self.metadata.as_ref()
    }

    pub fn strategy(&self) -> Option<&Arc<dyn SearchStrategy>> {
        self.strategy.as_ref()
    }

    /// Current candidate list.
    pub fn options(&self) -> &[TargetRecord] {
        &self.options
    }

    /// Header above the option list, e.g. "All Accounts".
    pub fn all_records_label(&self) -> Option<String> {
        self.metadata.as_ref().map(EntityMetadata::all_records_label)
    }

    /// Label of the create action, e.g. "New Account".
    pub fn new_record_label(&self) -> Option<String> {
        self.metadata.as_ref().map(EntityMetadata::new_record_label)
    }

    /// Loads the pre-query options and the current selection.
    pub async fn load_initial(&mut self) {
        if let Some(strategy) = &self.strategy {
            self.options = strategy.initial_results().await;
        }
        if let Err(e) = self.refresh_selection().await {
            warn!("Could not load selection: {e}");
        }
    }

    /// Reloads the relationship rows from the store.
    pub async fn refresh_selection(&self) -> EngineResult<()> {
        if let Some(dataset) = &self.dataset {
            dataset.refresh().await?;
        }
        Ok(())
    }

    /// Runs a search and replaces the options with its results.
    ///
    /// In advanced mode a blank query leaves the options unchanged.
    pub async fn search(&mut self, query: &str) -> &[TargetRecord] {
        let Some(strategy) = &self.strategy else {
            debug!("No search strategy; ignoring query");
            return &self.options;
        };
        if strategy.mode() == SearchMode::Advanced && query.trim().is_empty() {
            return &self.options;
        }
        self.options = strategy.search(query).await;
        &self.options
    }

    /// Handles raw input. Simple mode searches immediately; advanced mode
    /// waits for [`settle`](Self::settle).
    pub async fn on_input(&mut self, text: &str) {
        match self.settings.search_mode {
            SearchMode::Simple => {
                self.search(text).await;
            }
            SearchMode::Advanced => self.gate.push(text.to_string()),
        }
    }

    /// Waits for the latest input to settle and searches with it.
    ///
    /// Only the most recent input is ever searched; a term that settled
    /// before newer input arrived is discarded. Returns false when no input
    /// was pending.
    pub async fn settle(&mut self) -> bool {
        let term = if self.gate.is_pending() {
            self.settled.next().await
        } else {
            self.settled.try_next()
        };
        let Some(term) = term else {
            return false;
        };
        self.search(&term).await;
        true
    }

    /// Display values of the linked rows.
    pub async fn selection(&self) -> Vec<String> {
        match &self.dataset {
            Some(dataset) => dataset.display_values().await,
            None => Vec::new(),
        }
    }

    /// Reconciles the store with `desired` display values.
    pub async fn apply_selection(&self, desired: &[String]) -> ReconcileReport {
        let Some(dataset) = &self.dataset else {
            warn!("No relationship dataset; selection not applied");
            return ReconcileReport::default();
        };
        let rows = dataset.rows().await;
        let prior: Vec<String> = rows.iter().map(|r| r.display_value.clone()).collect();
        self.reconciler
            .apply(desired, &prior, &self.options, &rows, dataset.as_ref())
            .await
    }

    /// Reconciles the store with `desired` record ids.
    pub async fn apply_selection_ids(&self, desired: &[RecordId]) -> ReconcileReport {
        let Some(dataset) = &self.dataset else {
            warn!("No relationship dataset; selection not applied");
            return ReconcileReport::default();
        };
        let rows = dataset.rows().await;
        self.reconciler
            .apply_ids(desired, &self.options, &rows, dataset.as_ref())
            .await
    }

    /// Unlinks the row displaying `value`.
    pub async fn remove(&self, value: &str) -> ReconcileReport {
        let desired: Vec<String> = self
            .selection()
            .await
            .into_iter()
            .filter(|v| v != value)
            .collect();
        self.apply_selection(&desired).await
    }

    /// Swaps in new settings, rebuilding the strategy from scratch.
    ///
    /// Metadata is reused when the target collection is unchanged. Options
    /// are cleared and a dataset set through [`with_dataset`](Self::with_dataset)
    /// is replaced; call [`load_initial`](Self::load_initial) afterwards.
    pub async fn reconfigure(&mut self, settings: LookupSettings) -> EngineResult<()> {
        settings.validate()?;
        let metadata = match self.metadata.take() {
            Some(m) if settings.target_entity == self.settings.target_entity => Some(m),
            _ => fetch_metadata(self.client.as_ref(), &settings.target_entity).await,
        };

        self.gate.cancel();
        let (gate, settled) = DebounceGate::new(settings.debounce);
        self.gate = gate;
        self.settled = settled;
        self.reconciler = reconciler_for(&self.client, &settings);
        self.options.clear();
        self.settings = settings;
        self.install(metadata);
        info!("Reconfigured lookup for {}", self.settings.host);
        Ok(())
    }

    fn install(&mut self, metadata: Option<EntityMetadata>) {
        self.strategy = None;
        self.dataset = None;
        if let Some(metadata) = &metadata {
            let config = self.settings.strategy_config(metadata);
            self.dataset = Some(Arc::new(StoreDataset::new(
                Arc::clone(&self.client),
                self.settings.host.clone(),
                self.settings.relationship.clone(),
                &config,
            )));
            self.strategy = Some(build_strategy(
                Arc::clone(&self.client),
                config,
                self.settings.search_mode,
            ));
        }
        self.metadata = metadata;
    }
}

async fn fetch_metadata(client: &dyn RemoteStoreClient, collection: &str) -> Option<EntityMetadata> {
    match client.get_entity_metadata(collection).await {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            warn!("Metadata for {collection} unavailable: {e}");
            None
        }
    }
}

fn reconciler_for(client: &Arc<dyn RemoteStoreClient>, settings: &LookupSettings) -> SelectionReconciler {
    SelectionReconciler::new(
        Arc::clone(client),
        settings.host.clone(),
        settings.target_entity.clone(),
        settings.relationship.clone(),
    )
}

impl std::fmt::Debug for LookupSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupSession")
            .field("settings", &self.settings)
            .field("metadata", &self.metadata)
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}
