//! Selection reconciliation and session orchestration for multilookup.
//!
//! [`SelectionReconciler`] diffs a desired selection against the persisted
//! relationship, issues the associate/disassociate calls and reloads the
//! [`RelationshipDataset`] once per batch. [`LookupSession`] ties a search
//! strategy, the option list, the dataset and the reconciler together for
//! one host record.

mod dataset;
mod diff;
mod error;
mod reconciler;
mod session;
mod settings;

pub use dataset::{RelationshipDataset, StoreDataset};
pub use diff::SelectionDiff;
pub use error::{EngineError, EngineResult};
pub use reconciler::{FailedLink, LinkOp, ReconcileReport, SelectionReconciler};
pub use session::LookupSession;
pub use settings::LookupSettings;
