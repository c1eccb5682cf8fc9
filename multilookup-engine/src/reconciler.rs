//! Selection reconciliation.
//!
//! Turns a desired selection into associate/disassociate calls against the
//! store, then reloads the host's dataset. Calls run one at a time, links
//! before unlinks. A failing call is logged and recorded in the report; the
//! rest of the batch still runs. The dataset refresh that follows is the
//! recovery mechanism for partial failures.

use crate::dataset::RelationshipDataset;
use crate::diff::SelectionDiff;
use multilookup_store::{
    AssociateRequest, DisassociateRequest, RemoteStoreClient, StoreRequest, StoreResult,
};
use multilookup_types::{EntityReference, RecordId, SelectedRow, TargetRecord};
use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Kind of relationship write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkOp {
    Associate,
    Disassociate,
}

impl fmt::Display for LinkOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOp::Associate => write!(f, "associate"),
            LinkOp::Disassociate => write!(f, "disassociate"),
        }
    }
}

/// A write that failed inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLink {
    pub op: LinkOp,
    pub id: RecordId,
    pub error: String,
}

/// Outcome of one reconcile call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Set when at least one item needed a change.
    pub batch_id: Option<Uuid>,
    pub associated: Vec<RecordId>,
    pub disassociated: Vec<RecordId>,
    /// Values (or ids) that could not be resolved to a record.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedLink>,
    /// Whether the dataset was reloaded successfully.
    pub refreshed: bool,
}

impl ReconcileReport {
    /// Number of store writes attempted.
    pub fn attempted(&self) -> usize {
        self.associated.len() + self.disassociated.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Applies selection changes for one host record and relationship.
pub struct SelectionReconciler {
    client: Arc<dyn RemoteStoreClient>,
    host: EntityReference,
    target_entity_type: String,
    relationship: String,
}

impl SelectionReconciler {
    pub fn new(
        client: Arc<dyn RemoteStoreClient>,
        host: EntityReference,
        target_entity_type: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            client,
            host,
            target_entity_type: target_entity_type.into(),
            relationship: relationship.into(),
        }
    }

    /// Reconciles by display value.
    ///
    /// Adds resolve to the first candidate with an equal display value;
    /// removes resolve to the first known row with an equal display value.
    /// Unresolvable values are skipped.
    pub async fn apply(
        &self,
        desired: &[String],
        prior: &[String],
        candidates: &[TargetRecord],
        known_rows: &[SelectedRow],
        dataset: &dyn RelationshipDataset,
    ) -> ReconcileReport {
        let diff = SelectionDiff::compute(desired, prior);
        if diff.is_empty() {
            debug!("Selection unchanged for {}", self.host);
            return ReconcileReport::default();
        }
        let mut skipped = Vec::new();

        let adds = diff
            .to_add
            .iter()
            .filter_map(|value| {
                let found = first_match(
                    candidates.iter().filter(|c| c.display_value == *value),
                    value,
                )
                .map(|c| c.id.clone());
                if found.is_none() {
                    debug!("No candidate displays {value:?}; skipping");
                    skipped.push(value.clone());
                }
                found
            })
            .collect();

        let removes = diff
            .to_remove
            .iter()
            .filter_map(|value| {
                let found = first_match(
                    known_rows.iter().filter(|r| r.display_value == *value),
                    value,
                )
                .map(|r| r.id.clone());
                if found.is_none() {
                    debug!("No selected row displays {value:?}; skipping");
                    skipped.push(value.clone());
                }
                found
            })
            .collect();

        self.run_batch(adds, removes, skipped, dataset).await
    }

    /// Reconciles by record id.
    ///
    /// Adds must be among `candidates`; removes are the known rows whose id
    /// is no longer desired.
    pub async fn apply_ids(
        &self,
        desired: &[RecordId],
        candidates: &[TargetRecord],
        known_rows: &[SelectedRow],
        dataset: &dyn RelationshipDataset,
    ) -> ReconcileReport {
        let prior: Vec<RecordId> = known_rows.iter().map(|r| r.id.clone()).collect();
        let diff = SelectionDiff::compute(desired, &prior);
        if diff.is_empty() {
            debug!("Selection unchanged for {}", self.host);
            return ReconcileReport::default();
        }
        let mut skipped = Vec::new();

        let adds = diff
            .to_add
            .into_iter()
            .filter(|id| {
                let known = candidates.iter().any(|c| c.id == *id);
                if !known {
                    debug!("Id {id} is not among the candidates; skipping");
                    skipped.push(id.to_string());
                }
                known
            })
            .collect();

        self.run_batch(adds, diff.to_remove, skipped, dataset).await
    }

    async fn run_batch(
        &self,
        adds: Vec<RecordId>,
        removes: Vec<RecordId>,
        skipped: Vec<String>,
        dataset: &dyn RelationshipDataset,
    ) -> ReconcileReport {
        let batch_id = Uuid::now_v7();
        let mut report = ReconcileReport {
            batch_id: Some(batch_id),
            skipped,
            ..Default::default()
        };
        let span = info_span!(
            "reconcile",
            batch = %batch_id,
            host = %self.host,
            relationship = %self.relationship
        );

        async {
            info!(
                "Applying {} link(s) and {} unlink(s)",
                adds.len(),
                removes.len()
            );

            for id in adds {
                match self.associate(&id).await {
                    Ok(()) => report.associated.push(id),
                    Err(e) => {
                        warn!("Error associating {id}: {e}");
                        report.failed.push(FailedLink {
                            op: LinkOp::Associate,
                            id,
                            error: e.to_string(),
                        });
                    }
                }
            }

            for id in removes {
                match self.disassociate(&id).await {
                    Ok(()) => report.disassociated.push(id),
                    Err(e) => {
                        warn!("Error disassociating {id}: {e}");
                        report.failed.push(FailedLink {
                            op: LinkOp::Disassociate,
                            id,
                            error: e.to_string(),
                        });
                    }
                }
            }

            match dataset.refresh().await {
                Ok(()) => report.refreshed = true,
                Err(e) => warn!("Dataset refresh failed: {e}"),
            }

            info!(
                "Batch done: {} linked, {} unlinked, {} failed, {} skipped",
                report.associated.len(),
                report.disassociated.len(),
                report.failed.len(),
                report.skipped.len()
            );
        }
        .instrument(span)
        .await;

        report
    }

    async fn associate(&self, id: &RecordId) -> StoreResult<()> {
        let request = AssociateRequest::new(
            EntityReference::new(self.target_entity_type.clone(), id.clone()),
            vec![self.host.clone()],
            self.relationship.clone(),
        )?;
        self.client
            .execute(&StoreRequest::from(request))
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn disassociate(&self, id: &RecordId) -> StoreResult<()> {
        let request =
            DisassociateRequest::new(self.host.clone(), id.clone(), self.relationship.clone());
        self.client
            .execute(&StoreRequest::from(request))
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// First item of `matches`, logging when the value is ambiguous.
fn first_match<'a, T: 'a>(mut matches: impl Iterator<Item = &'a T>, value: &str) -> Option<&'a T> {
    let first = matches.next()?;
    if matches.next().is_some() {
        debug!("Display value {value:?} is ambiguous; using the first match");
    }
    Some(first)
}
