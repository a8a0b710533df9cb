//! Hand-written doubles for the ports, shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use pulse_domain::{
    HttpMethod, KeyValue, NewRequest, Notice, PersistedRequest, RequestDetails, RequestUpdate,
    RunRecord, ServiceEnvelope, TabId,
};

use crate::ports::{Clock, Notifier, RequestService, ServiceResult, TransportError};

/// A call observed by the mock service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch(String),
    Execute(String),
    Create(NewRequest),
    Update(RequestUpdate),
    Delete(String),
    Headers(String, Vec<KeyValue>),
    QueryParams(String, Vec<KeyValue>),
    Body(String, String),
}

pub fn details(id: &str, collection_id: &str) -> RequestDetails {
    RequestDetails {
        name: format!("Request {id}"),
        method: HttpMethod::Get,
        url: format!("https://api.example.com/{id}"),
        headers: vec![],
        query_params: vec![],
        body: None,
        collection_id: collection_id.to_string(),
    }
}

pub fn run_record(request_id: &str, status: u16) -> RunRecord {
    RunRecord {
        id: "run-1".to_string(),
        request_id: Some(request_id.to_string()),
        executed_at: fixed_time(),
        status,
        body: Some("{\"ok\":true}".to_string()),
        headers: BTreeMap::new(),
        duration: Duration::from_millis(87),
        error: None,
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap()
}

#[derive(Default)]
pub struct MockRequestService {
    details: Mutex<HashMap<String, RequestDetails>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    commit_gate: Mutex<Option<oneshot::Receiver<()>>>,
    execute_gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<Call>>,
    execute_response: Mutex<Option<ServiceResult<RunRecord>>>,
    create_response: Mutex<Option<ServiceResult<PersistedRequest>>>,
    update_response: Mutex<Option<ServiceResult<PersistedRequest>>>,
    delete_response: Mutex<Option<ServiceResult<()>>>,
    commit_response: Mutex<Option<ServiceResult<()>>>,
}

impl MockRequestService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_details(&self, id: &str, details: RequestDetails) {
        self.details.lock().insert(id.to_string(), details);
    }

    /// Holds the next fetch of `id` until the returned sender fires.
    pub fn gate_fetch(&self, id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(id.to_string(), rx);
        tx
    }

    /// Holds the next editor commit until the returned sender fires.
    pub fn gate_next_commit(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.commit_gate.lock() = Some(rx);
        tx
    }

    /// Holds the next execution until the returned sender fires or drops.
    pub fn gate_next_execute(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.execute_gate.lock() = Some(rx);
        tx
    }

    pub fn respond_execute(&self, response: ServiceResult<RunRecord>) {
        *self.execute_response.lock() = Some(response);
    }

    pub fn respond_create(&self, response: ServiceResult<PersistedRequest>) {
        *self.create_response.lock() = Some(response);
    }

    pub fn respond_update(&self, response: ServiceResult<PersistedRequest>) {
        *self.update_response.lock() = Some(response);
    }

    pub fn respond_delete(&self, response: ServiceResult<()>) {
        *self.delete_response.lock() = Some(response);
    }

    pub fn respond_commits(&self, response: ServiceResult<()>) {
        *self.commit_response.lock() = Some(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    async fn pass(gate: &Mutex<Option<oneshot::Receiver<()>>>) {
        let gate = gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn commit_result(&self) -> ServiceResult<()> {
        self.commit_response
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(ServiceEnvelope::done("Saved")))
    }
}

#[async_trait]
impl RequestService for MockRequestService {
    async fn fetch_request_details(&self, id: &TabId) -> ServiceResult<RequestDetails> {
        self.record(Call::Fetch(id.to_string()));
        let gate = self.gates.lock().remove(id.as_str());
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let details = self.details.lock().get(id.as_str()).cloned();
        Ok(details.map_or_else(
            || ServiceEnvelope::failed("Request not found"),
            |d| ServiceEnvelope::ok("Request loaded", d),
        ))
    }

    async fn execute_request(&self, id: &TabId) -> ServiceResult<RunRecord> {
        self.record(Call::Execute(id.to_string()));
        Self::pass(&self.execute_gate).await;
        self.execute_response
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(ServiceEnvelope::ok("Executed", run_record(id.as_str(), 200))))
    }

    async fn create_request(&self, request: &NewRequest) -> ServiceResult<PersistedRequest> {
        self.record(Call::Create(request.clone()));
        self.create_response.lock().clone().unwrap_or_else(|| {
            Ok(ServiceEnvelope::ok(
                "Request created",
                PersistedRequest {
                    id: "req-7".to_string(),
                    details: RequestDetails {
                        name: request.name.clone(),
                        method: request.method,
                        url: request.url.clone(),
                        headers: request.headers.clone(),
                        query_params: request.query_params.clone(),
                        body: request.body.clone(),
                        collection_id: request.collection_id.clone(),
                    },
                },
            ))
        })
    }

    async fn update_request(&self, update: &RequestUpdate) -> ServiceResult<PersistedRequest> {
        self.record(Call::Update(update.clone()));
        if let Some(response) = self.update_response.lock().clone() {
            return response;
        }
        let mut details = self
            .details
            .lock()
            .get(&update.id)
            .cloned()
            .unwrap_or_else(|| details(&update.id, "col-1"));
        details.name.clone_from(&update.name);
        details.url.clone_from(&update.url);
        details.method = update.method;
        if let Some(collection_id) = &update.collection_id {
            details.collection_id.clone_from(collection_id);
        }
        Ok(ServiceEnvelope::ok(
            "Request updated",
            PersistedRequest {
                id: update.id.clone(),
                details,
            },
        ))
    }

    async fn delete_request(&self, id: &TabId) -> ServiceResult<()> {
        self.record(Call::Delete(id.to_string()));
        self.delete_response
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(ServiceEnvelope::done("Request deleted")))
    }

    async fn commit_headers(&self, id: &TabId, headers: &[KeyValue]) -> ServiceResult<()> {
        self.record(Call::Headers(id.to_string(), headers.to_vec()));
        Self::pass(&self.commit_gate).await;
        self.commit_result()
    }

    async fn commit_query_params(&self, id: &TabId, params: &[KeyValue]) -> ServiceResult<()> {
        self.record(Call::QueryParams(id.to_string(), params.to_vec()));
        Self::pass(&self.commit_gate).await;
        self.commit_result()
    }

    async fn commit_body(&self, id: &TabId, body: &str) -> ServiceResult<()> {
        self.record(Call::Body(id.to_string(), body.to_string()));
        Self::pass(&self.commit_gate).await;
        self.commit_result()
    }
}

pub fn transport_error(message: &str) -> TransportError {
    TransportError::new(message)
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_time()
    }
}
