//! Request payloads exchanged with the request service

use serde::{Deserialize, Serialize};

use super::{HttpMethod, KeyValue};

/// Authoritative representation of a persisted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    /// Human-readable name
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL
    pub url: String,
    /// Request headers in display order
    #[serde(default)]
    pub headers: Vec<KeyValue>,
    /// Query parameters in display order
    #[serde(default)]
    pub query_params: Vec<KeyValue>,
    /// Raw body, if any
    #[serde(default)]
    pub body: Option<String>,
    /// Owning collection
    pub collection_id: String,
}

/// A persisted request as returned by create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRequest {
    /// Durable primary key issued by the backend
    pub id: String,
    /// Server-confirmed fields
    #[serde(flatten)]
    pub details: RequestDetails,
}

/// Payload for promoting an unsaved tab into a persisted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    /// Workspace the target collection belongs to
    pub workspace_id: String,
    /// Target collection
    pub collection_id: String,
    /// Chosen name
    pub name: String,
    /// Target URL
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Raw body, if any
    pub body: Option<String>,
    /// Request headers
    pub headers: Vec<KeyValue>,
    /// Query parameters
    pub query_params: Vec<KeyValue>,
}

/// Metadata update for an already persisted request.
///
/// `collection_id` is only sent when the request is being moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestUpdate {
    /// Durable id of the request being updated
    pub id: String,
    /// New name
    pub name: String,
    /// New URL
    pub url: String,
    /// New method
    pub method: HttpMethod,
    /// Destination collection when moving
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}
