//! Active-tab synchronization.
//!
//! Whenever a persisted tab becomes active, its authoritative representation
//! is fetched from the request service and merged into the store. Responses
//! that resolve after the user moved on to another activation are discarded.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ApplicationError, EnvelopeResultExt};
use crate::ports::RequestService;
use crate::tab_store::{ActiveTicket, SharedTabStore};
use pulse_domain::{Tab, TabUpdate};

/// What happened to a synchronization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fetched fields were merged into the tab.
    Applied,
    /// Nothing to sync: no active tab, or the tab was never persisted.
    Skipped,
    /// The activation changed while the fetch was in flight.
    Stale,
    /// The fetch failed; the tab keeps its local state.
    Failed(ApplicationError),
}

/// Reconciles the active tab with the request service.
pub struct ActiveTabSynchronizer {
    store: SharedTabStore,
    service: Arc<dyn RequestService>,
}

impl ActiveTabSynchronizer {
    /// Creates a synchronizer over a shared store.
    pub fn new(store: SharedTabStore, service: Arc<dyn RequestService>) -> Self {
        Self { store, service }
    }

    /// Synchronizes whatever tab is active right now.
    pub async fn sync_active(&self) -> SyncOutcome {
        let ticket = self.store.read().active_ticket();
        match ticket {
            Some(ticket) => self.sync(ticket).await,
            None => SyncOutcome::Skipped,
        }
    }

    /// Synchronizes the tab of one activation.
    ///
    /// The merge is only applied if the ticket is still current when the
    /// fetch resolves. No retry is attempted on failure.
    pub async fn sync(&self, ticket: ActiveTicket) -> SyncOutcome {
        let persisted = self.store.read().tab(&ticket.id).is_some_and(Tab::is_saved);
        if !persisted {
            return SyncOutcome::Skipped;
        }

        let result = self.service.fetch_request_details(&ticket.id).await;

        let mut store = self.store.write();
        if !store.is_current(&ticket) {
            debug!(tab = %ticket.id, "discarding sync response for a stale activation");
            return SyncOutcome::Stale;
        }
        match result.into_data() {
            Ok(details) => {
                store.update_tab(&ticket.id, TabUpdate::Synced(details));
                debug!(tab = %ticket.id, "synced active tab");
                SyncOutcome::Applied
            }
            Err(err) => {
                warn!(tab = %ticket.id, error = %err, "failed to sync active tab");
                SyncOutcome::Failed(err)
            }
        }
    }

    /// Spawns a task that syncs every new activation published by the store.
    ///
    /// Each activation gets its own fetch so a slow response never delays
    /// the next one; staleness is settled per ticket.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        let mut activations = self.store.read().subscribe();
        tokio::spawn(async move {
            while activations.changed().await.is_ok() {
                let ticket = activations.borrow_and_update().clone();
                if let Some(ticket) = ticket {
                    let this = Arc::clone(&self);
                    tokio::spawn(async move {
                        this.sync(ticket).await;
                    });
                }
            }
        })
    }
}
