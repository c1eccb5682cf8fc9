//! An in-memory store for testing.
//!
//! Keeps collections, metadata and relationship edges in memory, records
//! every call, and lets tests inject failures per record id.

use crate::client::{QueryOptions, Record, RemoteStoreClient};
use crate::error::{StoreError, StoreResult};
use crate::request::{SearchQueryRequest, StoreRequest};
use crate::response::StoreResponse;
use async_trait::async_trait;
use multilookup_types::{EntityMetadata, EntityReference, RecordId, RelationshipEdge};
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// A call observed by the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    RetrieveMultiple {
        collection: String,
        query: String,
    },
    RetrieveRelated {
        host: EntityReference,
        relationship: String,
    },
    Metadata {
        collection: String,
    },
    Associate {
        target: EntityReference,
        related: Vec<EntityReference>,
        relationship: String,
    },
    Disassociate {
        target: EntityReference,
        related_id: RecordId,
        relationship: String,
    },
    SearchQuery(SearchQueryRequest),
}

impl StoreCall {
    /// Whether this call mutates relationship edges.
    pub fn is_write(&self) -> bool {
        matches!(self, StoreCall::Associate { .. } | StoreCall::Disassociate { .. })
    }
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Record>>,
    metadata: HashMap<String, EntityMetadata>,
    edges: Vec<RelationshipEdge>,
    calls: Vec<StoreCall>,
    failing_ids: HashSet<RecordId>,
    rejected_ids: HashMap<RecordId, u16>,
    search_responses: VecDeque<StoreResult<StoreResponse>>,
    retrieve_fails: bool,
}

/// In-memory [`RemoteStoreClient`].
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collection's metadata.
    pub fn with_metadata(self, metadata: EntityMetadata) -> Self {
        self.lock()
            .metadata
            .insert(metadata.logical_name.clone(), metadata);
        self
    }

    /// Adds a record to a collection.
    pub fn with_record(self, collection: &str, record: Value) -> Self {
        if let Value::Object(map) = record {
            self.lock()
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(map);
        }
        self
    }

    /// Adds an existing relationship edge.
    pub fn with_edge(self, edge: RelationshipEdge) -> Self {
        self.lock().edges.push(edge);
        self
    }

    /// Makes every associate/disassociate touching `id` fail.
    pub fn fail_for(&self, id: impl Into<RecordId>) {
        self.lock().failing_ids.insert(id.into());
    }

    /// Makes every associate/disassociate touching `id` answer with a
    /// non-success `status` instead of failing in transport.
    pub fn reject_for(&self, id: impl Into<RecordId>, status: u16) {
        self.lock().rejected_ids.insert(id.into(), status);
    }

    /// Makes every retrieval fail.
    pub fn fail_retrievals(&self) {
        self.lock().retrieve_fails = true;
    }

    /// Queues the outcome of the next full-text search.
    pub fn queue_search_response(&self, response: StoreResult<StoreResponse>) {
        self.lock().search_responses.push_back(response);
    }

    /// All calls observed so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Number of associate/disassociate calls observed so far.
    pub fn write_count(&self) -> usize {
        self.lock().calls.iter().filter(|c| c.is_write()).count()
    }

    /// Clears the call log.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Current relationship edges.
    pub fn edges(&self) -> Vec<RelationshipEdge> {
        self.lock().edges.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn project(record: &Record, select: &[String]) -> Record {
        if select.is_empty() {
            return record.clone();
        }
        record
            .iter()
            .filter(|(key, _)| select.iter().any(|s| s == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn injected(id: &RecordId) -> StoreError {
        StoreError::Network(format!("injected failure for {id}"))
    }

    fn rejection(inner: &Inner, id: &RecordId) -> Option<StoreResponse> {
        inner
            .rejected_ids
            .get(id)
            .map(|status| StoreResponse::with_status(*status, "Rejected", format!("rejected {id}")))
    }
}

#[async_trait]
impl RemoteStoreClient for InMemoryStore {
    async fn retrieve_multiple(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> StoreResult<Vec<Record>> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::RetrieveMultiple {
            collection: collection.to_string(),
            query: options.to_query_string(),
        });
        if inner.retrieve_fails {
            return Err(StoreError::Network("retrieval unavailable".to_string()));
        }
        Ok(inner
            .collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .map(|r| Self::project(r, &options.select))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn retrieve_related(
        &self,
        host: &EntityReference,
        relationship: &str,
        options: &QueryOptions,
    ) -> StoreResult<Vec<Record>> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::RetrieveRelated {
            host: host.clone(),
            relationship: relationship.to_string(),
        });
        if inner.retrieve_fails {
            return Err(StoreError::Network("retrieval unavailable".to_string()));
        }

        let mut related = Vec::new();
        for edge in inner
            .edges
            .iter()
            .filter(|e| e.relationship_name == relationship && e.host() == *host)
        {
            let id_key = format!("{}id", edge.target_entity_type);
            let found = inner
                .collections
                .get(&edge.target_entity_type)
                .and_then(|records| {
                    records.iter().find(|r| {
                        r.get(&id_key).and_then(Value::as_str) == Some(edge.target_id.as_str())
                    })
                });
            if let Some(record) = found {
                related.push(Self::project(record, &options.select));
            }
        }
        Ok(related)
    }

    async fn get_entity_metadata(&self, collection: &str) -> StoreResult<EntityMetadata> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Metadata {
            collection: collection.to_string(),
        });
        inner
            .metadata
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("entity {collection}")))
    }

    async fn execute(&self, request: &StoreRequest) -> StoreResult<StoreResponse> {
        let mut inner = self.lock();
        match request {
            StoreRequest::Associate(r) => {
                inner.calls.push(StoreCall::Associate {
                    target: r.target.clone(),
                    related: r.related_entities.clone(),
                    relationship: r.relationship.clone(),
                });
                if inner.failing_ids.contains(&r.target.id) {
                    return Err(Self::injected(&r.target.id));
                }
                if let Some(response) = Self::rejection(&inner, &r.target.id) {
                    return Ok(response);
                }
                for related in &r.related_entities {
                    let edge = RelationshipEdge::between(related, &r.target, r.relationship.clone());
                    if !inner.edges.contains(&edge) {
                        inner.edges.push(edge);
                    }
                }
                Ok(StoreResponse::no_content())
            }
            StoreRequest::Disassociate(r) => {
                inner.calls.push(StoreCall::Disassociate {
                    target: r.target.clone(),
                    related_id: r.related_entity_id.clone(),
                    relationship: r.relationship.clone(),
                });
                if inner.failing_ids.contains(&r.related_entity_id) {
                    return Err(Self::injected(&r.related_entity_id));
                }
                if let Some(response) = Self::rejection(&inner, &r.related_entity_id) {
                    return Ok(response);
                }
                inner.edges.retain(|e| {
                    !(e.relationship_name == r.relationship
                        && e.host() == r.target
                        && e.target_id == r.related_entity_id)
                });
                Ok(StoreResponse::no_content())
            }
            StoreRequest::SearchQuery(r) => {
                inner.calls.push(StoreCall::SearchQuery(r.clone()));
                inner.search_responses.pop_front().unwrap_or_else(|| {
                    Ok(StoreResponse::ok(
                        serde_json::json!({ "response": "{\"Value\":[]}" }).to_string(),
                    ))
                })
            }
        }
    }
}
