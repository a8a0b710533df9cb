//! Request service port
//!
//! Boundary to the persistence/authorization service that owns requests,
//! collections and run records. Every call answers with a
//! [`ServiceEnvelope`]; a call that cannot be completed at all yields a
//! [`TransportError`] instead.

use async_trait::async_trait;
use thiserror::Error;

use pulse_domain::{
    KeyValue, NewRequest, PersistedRequest, RequestDetails, RequestUpdate, RunRecord,
    ServiceEnvelope, TabId,
};

/// The call to the request service itself failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Client-side description of the failure.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a request-service call.
pub type ServiceResult<T> = Result<ServiceEnvelope<T>, TransportError>;

/// Port for the backend that persists and executes requests.
#[async_trait]
pub trait RequestService: Send + Sync {
    /// Fetches the authoritative representation of a persisted request.
    async fn fetch_request_details(&self, id: &TabId) -> ServiceResult<RequestDetails>;

    /// Runs a persisted request on the server and returns the stored run.
    async fn execute_request(&self, id: &TabId) -> ServiceResult<RunRecord>;

    /// Persists a new request in a collection.
    async fn create_request(&self, request: &NewRequest) -> ServiceResult<PersistedRequest>;

    /// Renames, re-targets or moves a persisted request.
    async fn update_request(&self, update: &RequestUpdate) -> ServiceResult<PersistedRequest>;

    /// Deletes a persisted request.
    async fn delete_request(&self, id: &TabId) -> ServiceResult<()>;

    /// Replaces the headers of a persisted request.
    async fn commit_headers(&self, id: &TabId, headers: &[KeyValue]) -> ServiceResult<()>;

    /// Replaces the query parameters of a persisted request.
    async fn commit_query_params(&self, id: &TabId, params: &[KeyValue]) -> ServiceResult<()>;

    /// Replaces the body of a persisted request; empty means no body.
    async fn commit_body(&self, id: &TabId, body: &str) -> ServiceResult<()>;
}
