//! Quick-save use case.

use std::sync::Arc;

use tracing::info;

use pulse_domain::request::prepare_body_for_save;
use pulse_domain::{KeyValue, RequestUpdate, TabId};

use crate::error::{ApplicationError, ApplicationResult, EnvelopeResultExt};
use crate::ports::RequestService;
use crate::tab_store::SharedTabStore;

/// Snapshot of everything a quick-save commits.
struct Snapshot {
    headers: Vec<KeyValue>,
    query_params: Vec<KeyValue>,
    body: String,
    metadata: RequestUpdate,
}

/// Use case for committing every field of a saved tab at once.
pub struct QuickSave {
    store: SharedTabStore,
    service: Arc<dyn RequestService>,
}

impl QuickSave {
    /// Creates a new `QuickSave` use case.
    pub fn new(store: SharedTabStore, service: Arc<dyn RequestService>) -> Self {
        Self { store, service }
    }

    /// Commits headers, query params, body and metadata of a saved tab.
    ///
    /// Commits are sent in that order and stop at the first failure.
    ///
    /// # Errors
    /// - Returns error if the tab is not open or not saved, before any call
    /// - Returns error if the body does not parse, before any call
    /// - Returns error if the service refuses or cannot be reached
    pub async fn execute(&self, tab_id: &TabId) -> ApplicationResult<()> {
        let snapshot = self.snapshot(tab_id)?;

        self.service
            .commit_headers(tab_id, &snapshot.headers)
            .await
            .into_done()?;
        self.service
            .commit_query_params(tab_id, &snapshot.query_params)
            .await
            .into_done()?;
        self.service
            .commit_body(tab_id, &snapshot.body)
            .await
            .into_done()?;
        self.service
            .update_request(&snapshot.metadata)
            .await
            .into_data()?;

        info!(tab = %tab_id, "quick-saved request");
        Ok(())
    }

    fn snapshot(&self, tab_id: &TabId) -> ApplicationResult<Snapshot> {
        let store = self.store.read();
        let tab = store
            .tab(tab_id)
            .ok_or_else(|| ApplicationError::TabNotOpen(tab_id.clone()))?;
        if !tab.is_saved() {
            return Err(ApplicationError::Unsaved("save it"));
        }
        let body = prepare_body_for_save(tab.content_type, tab.body.as_deref().unwrap_or_default())?;
        Ok(Snapshot {
            headers: tab.headers.clone(),
            query_params: tab.query_params.clone(),
            body,
            metadata: RequestUpdate {
                id: tab_id.to_string(),
                name: tab.name.clone(),
                url: tab.url.clone(),
                method: tab.method,
                collection_id: None,
            },
        })
    }
}
