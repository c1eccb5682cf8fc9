//! OData Web API store implementation.
//!
//! Talks to a Dataverse-style `/api/data/v{version}` endpoint. Collections are
//! addressed by their entity set name, which is resolved from entity metadata
//! and cached per logical name.

use crate::client::{QueryOptions, Record, RemoteStoreClient};
use crate::error::{StoreError, StoreResult};
use crate::request::{AssociateRequest, DisassociateRequest, SearchQueryRequest, StoreRequest};
use crate::response::StoreResponse;
use async_trait::async_trait;
use multilookup_types::{EntityMetadata, EntityReference, RecordId};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Web API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebApiConfig {
    /// Organization URL, e.g. `https://contoso.crm.dynamics.com`.
    pub base_url: String,
    pub api_version: String,
    /// Pre-obtained bearer token. Acquiring one is the caller's concern.
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for WebApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_version: "9.2".to_string(),
            access_token: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ODataCollection {
    #[serde(default)]
    value: Vec<Record>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EntityDefinition {
    logical_name: String,
    primary_name_attribute: Option<String>,
    entity_set_name: Option<String>,
    display_name: Option<LocalizedLabel>,
    display_collection_name: Option<LocalizedLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LocalizedLabel {
    user_localized_label: Option<Label>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Label {
    label: String,
}

fn label_text(label: Option<LocalizedLabel>) -> Option<String> {
    label
        .and_then(|l| l.user_localized_label)
        .map(|l| l.label)
        .filter(|l| !l.is_empty())
}

/// Web API store client.
pub struct WebApiClient {
    config: WebApiConfig,
    client: Client,
    metadata_cache: Arc<RwLock<HashMap<String, EntityMetadata>>>,
}

impl WebApiClient {
    /// Creates a new client. Fails if the base URL is empty or the HTTP
    /// client cannot be built.
    pub fn new(config: WebApiConfig) -> StoreResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(StoreError::Config("base_url is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            metadata_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &WebApiConfig {
        &self.config
    }

    /// Absolute URL of a path below the API root.
    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/data/v{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_version,
            path
        )
    }

    /// `{set}({id})` key segment.
    fn record_path(entity_set: &str, id: &RecordId) -> String {
        format!("{entity_set}({})", urlencoding::encode(id.as_str()))
    }

    /// Adds auth and OData headers.
    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Accept", "application/json")
            .header("OData-MaxVersion", "4.0")
            .header("OData-Version", "4.0");
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn into_store_response(response: Response) -> StoreResult<StoreResponse> {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(format!("read response body failed: {e}")))?;
        Ok(StoreResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> StoreResult<StoreResponse> {
        let response = self
            .prepare(request)
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("{what} failed: {e}")))?;
        Self::into_store_response(response).await
    }

    /// Resolves the entity set name of a logical collection name.
    async fn entity_set(&self, collection: &str) -> StoreResult<String> {
        let metadata = self.get_entity_metadata(collection).await?;
        if metadata.entity_set_name.is_empty() {
            return Err(StoreError::Metadata(format!(
                "no entity set name for {collection}"
            )));
        }
        Ok(metadata.entity_set_name)
    }

    /// GETs a collection URL and follows `@odata.nextLink` pages.
    async fn fetch_all(&self, url: String, options: &QueryOptions) -> StoreResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut request = self.client.get(&url).query(&options.to_pairs());

        loop {
            let page = self
                .send(request, "retrieve")
                .await?
                .error_for_status()?;
            let collection: ODataCollection = page
                .json()
                .map_err(|e| StoreError::Decode(format!("collection page: {e}")))?;
            records.extend(collection.value);

            match collection.next_link {
                Some(next) => {
                    debug!("Following next page link");
                    request = self.client.get(next);
                }
                None => break,
            }
        }

        Ok(records)
    }

    async fn associate(&self, request: &AssociateRequest) -> StoreResult<StoreResponse> {
        let target_set = self.entity_set(&request.target.entity_type).await?;
        let url = self.api_url(&format!(
            "{}/{}/$ref",
            Self::record_path(&target_set, &request.target.id),
            request.relationship
        ));

        let mut last = StoreResponse::no_content();
        for related in &request.related_entities {
            let related_set = self.entity_set(&related.entity_type).await?;
            let body = serde_json::json!({
                "@odata.id": self.api_url(&Self::record_path(&related_set, &related.id)),
            });

            debug!(
                "Associating {} with {} via {}",
                request.target, related, request.relationship
            );
            let response = self
                .send(self.client.post(&url).json(&body), "associate")
                .await?;
            if !response.is_success() {
                return Ok(response);
            }
            last = response;
        }

        info!(
            "Associated {} with {} record(s)",
            request.target,
            request.related_entities.len()
        );
        Ok(last)
    }

    async fn disassociate(&self, request: &DisassociateRequest) -> StoreResult<StoreResponse> {
        let target_set = self.entity_set(&request.target.entity_type).await?;
        let url = self.api_url(&format!(
            "{}/{}({})/$ref",
            Self::record_path(&target_set, &request.target.id),
            request.relationship,
            urlencoding::encode(request.related_entity_id.as_str())
        ));

        debug!(
            "Disassociating {} from {} via {}",
            request.related_entity_id, request.target, request.relationship
        );
        let response = self
            .send(self.client.delete(&url), "disassociate")
            .await?;
        if response.is_success() {
            info!(
                "Disassociated {} from {}",
                request.related_entity_id, request.target
            );
        }
        Ok(response)
    }

    async fn search_query(&self, request: &SearchQueryRequest) -> StoreResult<StoreResponse> {
        debug!("Executing searchquery for {:?}", request.search);
        self.send(
            self.client.post(self.api_url("searchquery")).json(request),
            "searchquery",
        )
        .await
    }
}

#[async_trait]
impl RemoteStoreClient for WebApiClient {
    async fn retrieve_multiple(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> StoreResult<Vec<Record>> {
        let entity_set = self.entity_set(collection).await?;
        debug!(
            "Retrieving {}{}",
            entity_set,
            options.to_query_string()
        );
        self.fetch_all(self.api_url(&entity_set), options).await
    }

    async fn retrieve_related(
        &self,
        host: &EntityReference,
        relationship: &str,
        options: &QueryOptions,
    ) -> StoreResult<Vec<Record>> {
        let host_set = self.entity_set(&host.entity_type).await?;
        let url = self.api_url(&format!(
            "{}/{}",
            Self::record_path(&host_set, &host.id),
            relationship
        ));
        self.fetch_all(url, options).await
    }

    async fn get_entity_metadata(&self, collection: &str) -> StoreResult<EntityMetadata> {
        if let Some(metadata) = self.metadata_cache.read().await.get(collection) {
            return Ok(metadata.clone());
        }

        let url = self.api_url(&format!("EntityDefinitions(LogicalName='{collection}')"));
        let request = self.client.get(url).query(&[(
            "$select",
            "LogicalName,PrimaryNameAttribute,EntitySetName,DisplayName,DisplayCollectionName",
        )]);
        let response = self.send(request, "metadata").await?;
        if response.status == 404 {
            return Err(StoreError::NotFound(format!("entity {collection}")));
        }
        let definition: EntityDefinition = response
            .error_for_status()?
            .json()
            .map_err(|e| StoreError::Decode(format!("entity definition: {e}")))?;

        let primary_name_attribute = definition
            .primary_name_attribute
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                StoreError::Metadata(format!("{collection} has no primary name attribute"))
            })?;

        let metadata = EntityMetadata {
            display_name: label_text(definition.display_name)
                .unwrap_or_else(|| definition.logical_name.clone()),
            display_collection_name: label_text(definition.display_collection_name)
                .unwrap_or_else(|| definition.logical_name.clone()),
            entity_set_name: definition.entity_set_name.unwrap_or_default(),
            logical_name: definition.logical_name,
            primary_name_attribute,
        };

        debug!("Cached metadata for {}", collection);
        self.metadata_cache
            .write()
            .await
            .insert(collection.to_string(), metadata.clone());
        Ok(metadata)
    }

    async fn execute(&self, request: &StoreRequest) -> StoreResult<StoreResponse> {
        match request {
            StoreRequest::Associate(r) => self.associate(r).await,
            StoreRequest::Disassociate(r) => self.disassociate(r).await,
            StoreRequest::SearchQuery(r) => self.search_query(r).await,
        }
    }
}
