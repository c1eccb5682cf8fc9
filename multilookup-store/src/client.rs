//! Remote store abstraction.
//!
//! Defines the contract the search strategies and the reconciler consume,
//! allowing them to run against any backend (the Web API, or an in-memory
//! store in tests).

use crate::error::StoreResult;
use crate::request::StoreRequest;
use crate::response::StoreResponse;
use async_trait::async_trait;
use multilookup_types::{EntityMetadata, EntityReference};
use serde_json::{Map, Value};

/// A raw record as returned by the store: attribute name to value.
pub type Record = Map<String, Value>;

/// Select/filter/order options of a retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub select: Vec<String>,
    pub filter: Option<String>,
    pub order_by: Option<String>,
}

impl QueryOptions {
    /// Creates options selecting the given columns.
    pub fn select<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            select: columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, order_by: Option<String>) -> Self {
        self.order_by = order_by;
        self
    }

    /// Key/value pairs in OData system query option form.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if !self.select.is_empty() {
            pairs.push(("$select", self.select.join(",")));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("$filter", filter.clone()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("$orderby", order_by.clone()));
        }
        pairs
    }

    /// Unencoded native query string, e.g. `?$select=name,accountid&$filter=...`.
    pub fn to_query_string(&self) -> String {
        let pairs = self.to_pairs();
        if pairs.is_empty() {
            return String::new();
        }
        let joined = pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{joined}")
    }
}

/// Client of the remote relationship store.
#[async_trait]
pub trait RemoteStoreClient: Send + Sync {
    /// Retrieves the records of a collection.
    async fn retrieve_multiple(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> StoreResult<Vec<Record>>;

    /// Retrieves the records linked to `host` through `relationship`.
    async fn retrieve_related(
        &self,
        host: &EntityReference,
        relationship: &str,
        options: &QueryOptions,
    ) -> StoreResult<Vec<Record>>;

    /// Resolves the metadata of a collection.
    async fn get_entity_metadata(&self, collection: &str) -> StoreResult<EntityMetadata>;

    /// Executes an associate, disassociate or full-text search request.
    ///
    /// A non-success status is returned as a response, not as an error.
    async fn execute(&self, request: &StoreRequest) -> StoreResult<StoreResponse>;
}
