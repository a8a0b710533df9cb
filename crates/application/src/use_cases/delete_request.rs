//! Delete request use case.

use std::sync::Arc;

use tracing::info;

use pulse_domain::TabId;

use crate::error::{ApplicationError, ApplicationResult, EnvelopeResultExt};
use crate::ports::RequestService;
use crate::tab_store::SharedTabStore;

/// How a deleted tab went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The tab was never persisted and was closed locally.
    Discarded,
    /// The persisted request was deleted and its tab closed.
    Deleted,
}

/// Use case for deleting a request and closing its tab.
pub struct DeleteRequest {
    store: SharedTabStore,
    service: Arc<dyn RequestService>,
}

impl DeleteRequest {
    /// Creates a new `DeleteRequest` use case.
    pub fn new(store: SharedTabStore, service: Arc<dyn RequestService>) -> Self {
        Self { store, service }
    }

    /// Deletes the request behind a tab.
    ///
    /// Unsaved tabs have nothing to delete remotely and are just closed.
    /// A persisted tab is closed only once the service confirms.
    ///
    /// # Errors
    /// - Returns error if the tab is not open
    /// - Returns error if the service refuses or cannot be reached
    pub async fn execute(&self, tab_id: &TabId) -> ApplicationResult<DeleteOutcome> {
        let saved = self
            .store
            .read()
            .tab(tab_id)
            .map(pulse_domain::Tab::is_saved)
            .ok_or_else(|| ApplicationError::TabNotOpen(tab_id.clone()))?;

        if !saved {
            self.store.write().close_tab(tab_id);
            return Ok(DeleteOutcome::Discarded);
        }

        self.service.delete_request(tab_id).await.into_done()?;
        self.store.write().close_tab(tab_id);
        info!(tab = %tab_id, "deleted request");
        Ok(DeleteOutcome::Deleted)
    }
}
