//! Create request use case.
//!
//! Promotes an unsaved tab into a persisted request. The tab's identity
//! changes from a placeholder to the server-issued id, so the old tab is
//! replaced rather than updated in place.

use std::sync::Arc;

use tracing::info;

use pulse_domain::{DomainError, NewRequest, PersistedRequest, SaveState, Tab, TabId};

use crate::error::{ApplicationError, ApplicationResult, EnvelopeResultExt};
use crate::ports::RequestService;
use crate::tab_store::SharedTabStore;

/// Input for saving an unsaved tab to a collection.
#[derive(Debug, Clone)]
pub struct CreateRequestInput {
    /// The unsaved tab being promoted.
    pub tab_id: TabId,
    /// Workspace the target collection belongs to.
    pub workspace_id: String,
    /// Target collection.
    pub collection_id: String,
    /// Name chosen for the request.
    pub name: String,
}

/// Output from creating a request.
#[derive(Debug, Clone)]
pub struct CreateRequestOutput {
    /// Id of the tab now holding the persisted request.
    pub tab_id: TabId,
    /// The request as confirmed by the service.
    pub request: PersistedRequest,
}

/// Use case for promoting an unsaved tab.
pub struct CreateRequest {
    store: SharedTabStore,
    service: Arc<dyn RequestService>,
}

impl CreateRequest {
    /// Creates a new `CreateRequest` use case.
    pub fn new(store: SharedTabStore, service: Arc<dyn RequestService>) -> Self {
        Self { store, service }
    }

    /// Persists the tab's definition and swaps the tab to its durable id.
    ///
    /// On failure the unsaved tab stays open and untouched.
    ///
    /// # Errors
    /// - Returns error if the tab is not open or already saved
    /// - Returns error if the name, collection or workspace is blank
    /// - Returns error if the service refuses or cannot be reached
    pub async fn execute(&self, input: CreateRequestInput) -> ApplicationResult<CreateRequestOutput> {
        let (payload, content_type) = {
            let store = self.store.read();
            let tab = store
                .tab(&input.tab_id)
                .ok_or_else(|| ApplicationError::TabNotOpen(input.tab_id.clone()))?;
            if tab.is_saved() {
                return Err(ApplicationError::AlreadySaved);
            }
            (Self::payload(tab, &input)?, tab.content_type)
        };

        let mut request = self.service.create_request(&payload).await.into_data()?;
        let new_id = TabId::persisted(request.id.clone())?;
        if !SaveState::from_collection_id(&request.details.collection_id).is_saved() {
            request.details.collection_id = payload.collection_id;
        }

        let mut tab = Tab::from_persisted(new_id.clone(), request.details.clone());
        tab.content_type = content_type;
        {
            let mut store = self.store.write();
            store.open_tab(tab);
            store.close_tab(&input.tab_id);
        }
        info!(from = %input.tab_id, to = %new_id, "saved request to collection");

        Ok(CreateRequestOutput {
            tab_id: new_id,
            request,
        })
    }

    fn payload(tab: &Tab, input: &CreateRequestInput) -> ApplicationResult<NewRequest> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::BlankField("Name").into());
        }
        if input.collection_id.trim().is_empty() {
            return Err(DomainError::BlankField("Collection").into());
        }
        if input.workspace_id.trim().is_empty() {
            return Err(DomainError::BlankField("Workspace").into());
        }
        Ok(NewRequest {
            workspace_id: input.workspace_id.clone(),
            collection_id: input.collection_id.clone(),
            name: name.to_string(),
            url: tab.url.clone(),
            method: tab.method,
            body: tab.body.clone(),
            headers: tab.headers.clone(),
            query_params: tab.query_params.clone(),
        })
    }
}
