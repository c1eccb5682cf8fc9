//! Request shapes accepted by [`RemoteStoreClient::execute`].
//!
//! Field names and nesting follow what the store expects on the wire. In
//! particular the full-text search request carries its entity list, options
//! and order list as JSON *strings*, not as nested objects.
//!
//! [`RemoteStoreClient::execute`]: crate::RemoteStoreClient::execute

use crate::error::{StoreError, StoreResult};
use multilookup_types::{EntityReference, RecordId, WordMatch};
use serde::{Deserialize, Serialize};

/// Kind of operation a request represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Action,
    CrudOperation,
}

impl OperationType {
    /// Numeric code used by the store's operation dispatcher.
    pub const fn code(self) -> u8 {
        match self {
            OperationType::Action => 0,
            OperationType::CrudOperation => 2,
        }
    }
}

/// Describes how the store dispatches a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMetadata {
    pub bound_parameter: Option<String>,
    pub operation_type: OperationType,
    pub operation_name: &'static str,
}

/// Links one target record to one or more related records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateRequest {
    pub target: EntityReference,
    pub related_entities: Vec<EntityReference>,
    pub relationship: String,
}

impl AssociateRequest {
    /// Creates an associate request. `related_entities` must not be empty.
    pub fn new(
        target: EntityReference,
        related_entities: Vec<EntityReference>,
        relationship: impl Into<String>,
    ) -> StoreResult<Self> {
        if related_entities.is_empty() {
            return Err(StoreError::InvalidRequest(
                "associate needs at least one related entity".to_string(),
            ));
        }
        Ok(Self {
            target,
            related_entities,
            relationship: relationship.into(),
        })
    }

    pub fn metadata(&self) -> OperationMetadata {
        OperationMetadata {
            bound_parameter: None,
            operation_type: OperationType::CrudOperation,
            operation_name: "Associate",
        }
    }
}

/// Removes the link between a target record and one related record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisassociateRequest {
    pub target: EntityReference,
    pub related_entity_id: RecordId,
    pub relationship: String,
}

impl DisassociateRequest {
    pub fn new(
        target: EntityReference,
        related_entity_id: impl Into<RecordId>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            target,
            related_entity_id: related_entity_id.into(),
            relationship: relationship.into(),
        }
    }

    pub fn metadata(&self) -> OperationMetadata {
        OperationMetadata {
            bound_parameter: None,
            operation_type: OperationType::CrudOperation,
            operation_name: "Disassociate",
        }
    }
}

/// One collection to search in a full-text query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntity {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SelectColumns")]
    pub select_columns: Vec<String>,
    /// Absent means the store's default searchable columns.
    #[serde(rename = "SearchColumns", default, skip_serializing_if = "Option::is_none")]
    pub search_columns: Option<Vec<String>>,
    #[serde(rename = "Filter", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Matching semantics of a full-text query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(rename = "besteffortsearchenabled")]
    pub best_effort_search_enabled: bool,
    #[serde(rename = "searchmode")]
    pub search_mode: WordMatch,
}

/// Full-text search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQueryRequest {
    pub search: String,
    /// JSON-serialized `[SearchEntity]`.
    pub entities: String,
    /// JSON-serialized [`SearchOptions`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// JSON-serialized order list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
    pub count: bool,
}

impl SearchQueryRequest {
    /// Builds a request, serializing the nested payloads to strings.
    pub fn new(
        search: impl Into<String>,
        entities: &[SearchEntity],
        options: Option<&SearchOptions>,
        orderby: Option<&[String]>,
        count: bool,
    ) -> StoreResult<Self> {
        Ok(Self {
            search: search.into(),
            entities: serde_json::to_string(entities)?,
            options: options.map(serde_json::to_string).transpose()?,
            orderby: orderby.map(serde_json::to_string).transpose()?,
            count,
        })
    }

    /// Decodes the entity list back from its string form.
    pub fn decoded_entities(&self) -> StoreResult<Vec<SearchEntity>> {
        Ok(serde_json::from_str(&self.entities)?)
    }

    pub fn decoded_options(&self) -> StoreResult<Option<SearchOptions>> {
        self.options
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }

    pub fn decoded_orderby(&self) -> StoreResult<Option<Vec<String>>> {
        self.orderby
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }

    pub fn metadata(&self) -> OperationMetadata {
        OperationMetadata {
            bound_parameter: None,
            operation_type: OperationType::Action,
            operation_name: "searchquery",
        }
    }
}

/// Any request accepted by `execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    Associate(AssociateRequest),
    Disassociate(DisassociateRequest),
    SearchQuery(SearchQueryRequest),
}

impl StoreRequest {
    pub fn metadata(&self) -> OperationMetadata {
        match self {
            StoreRequest::Associate(r) => r.metadata(),
            StoreRequest::Disassociate(r) => r.metadata(),
            StoreRequest::SearchQuery(r) => r.metadata(),
        }
    }

    pub fn operation_name(&self) -> &'static str {
        self.metadata().operation_name
    }
}

impl From<AssociateRequest> for StoreRequest {
    fn from(request: AssociateRequest) -> Self {
        StoreRequest::Associate(request)
    }
}

impl From<DisassociateRequest> for StoreRequest {
    fn from(request: DisassociateRequest) -> Self {
        StoreRequest::Disassociate(request)
    }
}

impl From<SearchQueryRequest> for StoreRequest {
    fn from(request: SearchQueryRequest) -> Self {
        StoreRequest::SearchQuery(request)
    }
}
