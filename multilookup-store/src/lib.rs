//! Remote relationship store client for multilookup.
//!
//! The search strategies and the selection reconciler only depend on the
//! [`RemoteStoreClient`] trait. This crate provides:
//! - the request shapes (`Associate`, `Disassociate`, `searchquery`)
//! - response decoding, including the doubly-encoded search payload
//! - [`WebApiClient`], an OData Web API implementation over `reqwest`
//! - [`mock::InMemoryStore`], an in-memory implementation for tests
//!
//! # Example
//!
//! ```
//! use multilookup_store::{AssociateRequest, StoreRequest};
//! use multilookup_types::EntityReference;
//!
//! let request = AssociateRequest::new(
//!     EntityReference::new("account", "42"),
//!     vec![EntityReference::new("contact", "c1")],
//!     "contact_accounts",
//! )
//! .unwrap();
//! assert_eq!(StoreRequest::from(request).operation_name(), "Associate");
//! ```

mod client;
mod error;
pub mod mock;
mod request;
mod response;
mod web_api;

pub use client::{QueryOptions, Record, RemoteStoreClient};
pub use error::{StoreError, StoreResult};
pub use request::{
    AssociateRequest, DisassociateRequest, OperationMetadata, OperationType, SearchEntity,
    SearchOptions, SearchQueryRequest, StoreRequest,
};
pub use response::{SearchResultItem, SearchResultPage, StoreResponse, decode_search_response};
pub use web_api::{WebApiClient, WebApiConfig};
