//! Update request use case.

use std::sync::Arc;

use tracing::info;

use pulse_domain::{DomainError, PersistedRequest, RequestUpdate, SaveState, TabId, TabUpdate};

use crate::error::{ApplicationError, ApplicationResult, EnvelopeResultExt};
use crate::ports::RequestService;
use crate::tab_store::SharedTabStore;

/// Input for renaming or moving a saved request.
#[derive(Debug, Clone)]
pub struct UpdateRequestInput {
    /// The saved tab being updated.
    pub tab_id: TabId,
    /// New name.
    pub name: String,
    /// Destination collection; `None` keeps the current one.
    pub collection_id: Option<String>,
}

/// Use case for updating the metadata of a persisted request.
///
/// The durable id does not change, so the tab is updated in place.
pub struct UpdateRequest {
    store: SharedTabStore,
    service: Arc<dyn RequestService>,
}

impl UpdateRequest {
    /// Creates a new `UpdateRequest` use case.
    pub fn new(store: SharedTabStore, service: Arc<dyn RequestService>) -> Self {
        Self { store, service }
    }

    /// Sends the new name, URL and method, plus the destination collection
    /// when it differs from the current one.
    ///
    /// The tab takes the name and collection confirmed by the service, so a
    /// move the backend did not perform is never shown as done.
    ///
    /// # Errors
    /// - Returns error if the tab is not open or not saved
    /// - Returns error if the name is blank
    /// - Returns error if the service refuses or cannot be reached
    pub async fn execute(&self, input: UpdateRequestInput) -> ApplicationResult<PersistedRequest> {
        let (update, current_collection) = {
            let store = self.store.read();
            let tab = store
                .tab(&input.tab_id)
                .ok_or_else(|| ApplicationError::TabNotOpen(input.tab_id.clone()))?;
            let current = tab
                .collection_id()
                .ok_or(ApplicationError::Unsaved("rename or move it"))?
                .to_string();
            let name = input.name.trim();
            if name.is_empty() {
                return Err(DomainError::BlankField("Name").into());
            }
            let collection_id = input
                .collection_id
                .filter(|target| !target.trim().is_empty() && *target != current);
            let update = RequestUpdate {
                id: input.tab_id.to_string(),
                name: name.to_string(),
                url: tab.url.clone(),
                method: tab.method,
                collection_id,
            };
            (update, current)
        };

        let request = self.service.update_request(&update).await.into_data()?;

        let confirmed_collection = if SaveState::from_collection_id(&request.details.collection_id)
            .is_saved()
        {
            request.details.collection_id.clone()
        } else {
            current_collection
        };
        if update
            .collection_id
            .as_ref()
            .is_some_and(|target| *target != confirmed_collection)
        {
            info!(tab = %input.tab_id, "service kept the request in its collection");
        }
        self.store.write().update_tab(
            &input.tab_id,
            TabUpdate::Relocated {
                name: request.details.name.clone(),
                collection_id: confirmed_collection,
            },
        );

        Ok(request)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tab_store::TabStore;
    use crate::test_support::{Call, MockRequestService, details};
    use pretty_assertions::assert_eq;
    use pulse_domain::{HttpMethod, ServiceEnvelope, Tab};

    fn setup() -> (crate::tab_store::SharedTabStore, Arc<MockRequestService>, TabId) {
        let store = TabStore::shared();
        let service = Arc::new(MockRequestService::new());
        let id = TabId::persisted("req-1").unwrap();
        service.set_details("req-1", details("req-1", "col-1"));
        store
            .write()
            .open_tab(Tab::from_persisted(id.clone(), details("req-1", "col-1")));
        (store, service, id)
    }

    #[tokio::test]
    async fn test_rename_omits_unchanged_collection() {
        let (store, service, id) = setup();

        let use_case = UpdateRequest::new(store.clone(), service.clone());
        use_case
            .execute(UpdateRequestInput {
                tab_id: id.clone(),
                name: "List Users".to_string(),
                collection_id: Some("col-1".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(
            service.calls(),
            vec![Call::Update(RequestUpdate {
                id: "req-1".to_string(),
                name: "List Users".to_string(),
                url: "https://api.example.com/req-1".to_string(),
                method: HttpMethod::Get,
                collection_id: None,
            })]
        );
        let store = store.read();
        let tab = store.tab(&id).unwrap();
        assert_eq!(tab.name, "List Users");
        assert_eq!(tab.collection_id(), Some("col-1"));
    }

    #[tokio::test]
    async fn test_move_takes_confirmed_collection() {
        let (store, service, id) = setup();

        UpdateRequest::new(store.clone(), service.clone())
            .execute(UpdateRequestInput {
                tab_id: id.clone(),
                name: "Request req-1".to_string(),
                collection_id: Some("col-2".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(store.read().tab(&id).unwrap().collection_id(), Some("col-2"));
    }

    #[tokio::test]
    async fn test_unperformed_move_is_not_shown() {
        let (store, service, id) = setup();
        service.respond_update(Ok(ServiceEnvelope::ok(
            "Request updated",
            PersistedRequest {
                id: "req-1".to_string(),
                details: details("req-1", "col-1"),
            },
        )));

        UpdateRequest::new(store.clone(), service)
            .execute(UpdateRequestInput {
                tab_id: id.clone(),
                name: "Request req-1".to_string(),
                collection_id: Some("col-2".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(store.read().tab(&id).unwrap().collection_id(), Some("col-1"));
    }

    #[tokio::test]
    async fn test_failure_leaves_tab_untouched() {
        let (store, service, id) = setup();
        service.respond_update(Ok(ServiceEnvelope::failed("Name already taken")));
        let before = store.read().tab(&id).cloned();

        let result = UpdateRequest::new(store.clone(), service)
            .execute(UpdateRequestInput {
                tab_id: id.clone(),
                name: "Other".to_string(),
                collection_id: None,
            })
            .await;

        assert_eq!(
            result,
            Err(ApplicationError::Remote("Name already taken".to_string()))
        );
        assert_eq!(store.read().tab(&id).cloned(), before);
    }

    #[tokio::test]
    async fn test_unsaved_tab_is_refused() {
        let store = TabStore::shared();
        let service = Arc::new(MockRequestService::new());
        let tmp = store.write().open_new_tab();

        let result = UpdateRequest::new(store, service.clone())
            .execute(UpdateRequestInput {
                tab_id: tmp,
                name: "Anything".to_string(),
                collection_id: None,
            })
            .await;

        assert_eq!(result, Err(ApplicationError::Unsaved("rename or move it")));
        assert_eq!(service.call_count(), 0);
    }
}
