//! Responses returned by `execute`, and decoding of full-text search results.

use crate::client::Record;
use crate::error::{StoreError, StoreResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Raw response of an executed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl StoreResponse {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, "OK", body)
    }

    /// A `204 No Content` response.
    pub fn no_content() -> Self {
        Self::with_status(204, "No Content", "")
    }

    pub fn with_status(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> StoreResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Converts a non-success response into an error.
    pub fn error_for_status(self) -> StoreResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(StoreError::Status {
                status: self.status,
                body: if self.body.is_empty() {
                    self.status_text
                } else {
                    self.body
                },
            })
        }
    }
}

/// Outer body of a full-text search response. `response` is itself JSON.
#[derive(Debug, Deserialize)]
struct SearchQueryEnvelope {
    response: String,
}

/// One page of full-text search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResultPage {
    #[serde(rename = "Value", default)]
    pub value: Vec<SearchResultItem>,
}

/// A single full-text hit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResultItem {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Attributes", default)]
    pub attributes: Record,
}

/// Decodes a full-text search response.
///
/// The body is parsed twice: once for the envelope, once for the JSON string
/// it carries in `response`.
pub fn decode_search_response(response: &StoreResponse) -> StoreResult<SearchResultPage> {
    if !response.is_success() {
        return Err(StoreError::Status {
            status: response.status,
            body: response.status_text.clone(),
        });
    }
    let envelope: SearchQueryEnvelope = response.json()?;
    serde_json::from_str(&envelope.response)
        .map_err(|e| StoreError::Decode(format!("search response payload: {e}")))
}
