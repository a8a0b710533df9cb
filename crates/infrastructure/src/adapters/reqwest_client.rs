//! Request service implementation using reqwest.
//!
//! This adapter implements the `RequestService` port against the PulseAPI
//! backend. Every endpoint answers with a JSON envelope; a call that cannot
//! be completed, or whose answer is not an envelope, becomes a
//! `TransportError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;
use tracing::{debug, warn};

use pulse_application::ports::{RequestService, ServiceResult, TransportError};
use pulse_domain::{
    ClientSettings, KeyValue, NewRequest, PersistedRequest, RequestDetails, RequestUpdate,
    RunRecord, ServiceEnvelope, TabId,
};

/// User agent sent with every call.
const USER_AGENT: &str = concat!("Pulse/", env!("CARGO_PKG_VERSION"));

/// Request service backed by the PulseAPI HTTP API.
pub struct ReqwestRequestService {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestRequestService {
    /// Creates a service for the backend named in the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the client cannot
    /// be created.
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let base_url = Url::parse(&settings.api_base_url).map_err(|e| {
            TransportError::new(format!("Invalid API URL {}: {e}", settings.api_base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::new(format!(
                "Invalid API URL {}: not a base URL",
                settings.api_base_url
            )));
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(Self::with_client(client, base_url, settings.request_timeout()))
    }

    /// Creates a service with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }

    /// Builds `<base>/api/requests[/<id>[/<action>]]`.
    ///
    /// The id is percent-encoded as a single path segment.
    fn endpoint(&self, id: Option<&TabId>, action: Option<&str>) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| TransportError::new("API URL cannot carry a path"))?;
            segments.pop_if_empty().extend(["api", "requests"]);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    /// Sends a call and decodes its envelope.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ServiceResult<T> {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let response = builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;
        debug!(%status, bytes = body.len(), "request service answered");
        decode_envelope(status, &body)
    }

    /// Sends a call whose payload is irrelevant.
    async fn send_done(&self, builder: RequestBuilder) -> ServiceResult<()> {
        let envelope: ServiceEnvelope<IgnoredAny> = self.send(builder).await?;
        Ok(ServiceEnvelope {
            success: envelope.success,
            message: envelope.message,
            data: envelope.data.map(|_| ()),
        })
    }

    /// Maps reqwest errors to a client-side transport message.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        let host = error
            .url()
            .and_then(|u| u.host_str().map(ToString::to_string))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if error.is_timeout() {
            format!("The request service did not answer within {timeout_ms} ms")
        } else if error.is_connect() {
            let detail = error.to_string();
            if detail.to_lowercase().contains("refused") {
                format!("Connection to {host} was refused")
            } else {
                format!("Could not connect to {host}: {detail}")
            }
        } else if error.is_decode() || error.is_body() {
            format!("Could not read the answer from {host}: {error}")
        } else {
            error.to_string()
        };
        warn!(%host, error = %message, "request service call failed");
        TransportError::new(message)
    }
}

/// Decodes an envelope from a response body.
///
/// A non-2xx status with an envelope body is still an envelope, forced to
/// report failure. A body that is not an envelope is a transport failure.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ServiceResult<T> {
    match serde_json::from_slice::<ServiceEnvelope<T>>(body) {
        Ok(mut envelope) => {
            if !status.is_success() {
                envelope.success = false;
                envelope.data = None;
                if envelope.message.trim().is_empty() {
                    envelope.message = status_message(status);
                }
            }
            Ok(envelope)
        }
        Err(e) if status.is_success() => Err(TransportError::new(format!(
            "Unexpected answer from the request service: {e}"
        ))),
        Err(_) => Err(TransportError::new(status_message(status))),
    }
}

fn status_message(status: StatusCode) -> String {
    format!(
        "The request service answered {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

#[async_trait]
impl RequestService for ReqwestRequestService {
    async fn fetch_request_details(&self, id: &TabId) -> ServiceResult<RequestDetails> {
        let url = self.endpoint(Some(id), None)?;
        self.send(self.client.get(url)).await
    }

    async fn execute_request(&self, id: &TabId) -> ServiceResult<RunRecord> {
        let url = self.endpoint(Some(id), Some("run"))?;
        self.send(self.client.post(url)).await
    }

    async fn create_request(&self, request: &NewRequest) -> ServiceResult<PersistedRequest> {
        let url = self.endpoint(None, None)?;
        self.send(self.client.post(url).json(request)).await
    }

    async fn update_request(&self, update: &RequestUpdate) -> ServiceResult<PersistedRequest> {
        let id = TabId::persisted(update.id.clone())
            .map_err(|e| TransportError::new(e.to_string()))?;
        let url = self.endpoint(Some(&id), None)?;
        self.send(self.client.patch(url).json(update)).await
    }

    async fn delete_request(&self, id: &TabId) -> ServiceResult<()> {
        let url = self.endpoint(Some(id), None)?;
        self.send_done(self.client.delete(url)).await
    }

    async fn commit_headers(&self, id: &TabId, headers: &[KeyValue]) -> ServiceResult<()> {
        let url = self.endpoint(Some(id), Some("headers"))?;
        self.send_done(self.client.put(url).json(&json!({ "headers": headers })))
            .await
    }

    async fn commit_query_params(&self, id: &TabId, params: &[KeyValue]) -> ServiceResult<()> {
        let url = self.endpoint(Some(id), Some("query-params"))?;
        self.send_done(self.client.put(url).json(&json!({ "queryParams": params })))
            .await
    }

    async fn commit_body(&self, id: &TabId, body: &str) -> ServiceResult<()> {
        let url = self.endpoint(Some(id), Some("body"))?;
        self.send_done(self.client.put(url).json(&json!({ "body": body })))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn service(base: &str) -> ReqwestRequestService {
        let settings = ClientSettings {
            api_base_url: base.to_string(),
            request_timeout_ms: 2_000,
            ..ClientSettings::default()
        };
        ReqwestRequestService::new(&settings).unwrap()
    }

    fn id(raw: &str) -> TabId {
        TabId::persisted(raw).unwrap()
    }

    #[test]
    fn test_endpoints() {
        let service = service("http://localhost:3000");
        assert_eq!(
            service.endpoint(None, None).unwrap().as_str(),
            "http://localhost:3000/api/requests"
        );
        assert_eq!(
            service.endpoint(Some(&id("req-7")), Some("run")).unwrap().as_str(),
            "http://localhost:3000/api/requests/req-7/run"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_id() {
        let service = service("https://pulse.example.com/v1/");
        assert_eq!(
            service
                .endpoint(Some(&id("a/b c")), Some("query-params"))
                .unwrap()
                .as_str(),
            "https://pulse.example.com/v1/api/requests/a%2Fb%20c/query-params"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let settings = ClientSettings {
            api_base_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        assert!(ReqwestRequestService::new(&settings).is_err());

        let settings = ClientSettings {
            api_base_url: "mailto:team@example.com".to_string(),
            ..ClientSettings::default()
        };
        assert!(ReqwestRequestService::new(&settings).is_err());
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = br#"{
            "success": true,
            "message": "Request loaded",
            "data": {
                "name": "Get Users",
                "method": "GET",
                "url": "https://api.example.com/users",
                "headers": [{"key": "Accept", "value": "*/*"}],
                "collectionId": "col-42"
            }
        }"#;

        let envelope: ServiceEnvelope<RequestDetails> =
            decode_envelope(StatusCode::OK, body).unwrap();

        assert!(envelope.success);
        let details = envelope.data.unwrap();
        assert_eq!(details.collection_id, "col-42");
        assert_eq!(details.headers, vec![KeyValue::new("Accept", "*/*")]);
    }

    #[test]
    fn test_decode_failure_envelope_keeps_server_message() {
        let body = br#"{"success": false, "message": "Request not found"}"#;
        let envelope: ServiceEnvelope<RequestDetails> =
            decode_envelope(StatusCode::NOT_FOUND, body).unwrap();
        assert_eq!(envelope, ServiceEnvelope::failed("Request not found"));
    }

    #[test]
    fn test_decode_error_status_forces_failure() {
        let body = br#"{"success": true, "data": {"ignored": true}}"#;
        let envelope: ServiceEnvelope<IgnoredAny> =
            decode_envelope(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(
            envelope.message,
            "The request service answered 500 Internal Server Error"
        );
    }

    #[test]
    fn test_decode_non_envelope_is_transport_error() {
        let result: ServiceResult<RunRecord> =
            decode_envelope(StatusCode::BAD_GATEWAY, b"<html>Bad Gateway</html>");
        assert_eq!(
            result,
            Err(TransportError::new(
                "The request service answered 502 Bad Gateway"
            ))
        );

        let result: ServiceResult<RunRecord> = decode_envelope(StatusCode::OK, b"not json");
        assert!(result.unwrap_err().message.starts_with("Unexpected answer"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let service = service(&format!("http://127.0.0.1:{port}"));
        let result = service.fetch_request_details(&id("req-1")).await;

        assert!(result.is_err());
    }
}
