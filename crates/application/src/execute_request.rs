//! Execute Request Use Case
//!
//! Runs the active tab's persisted request through the server-side executor
//! and records the outcome as the tab's last run. Failures are recorded too,
//! as synthesized runs, so the response viewer always has a run to render.

use std::sync::Arc;

use tracing::{info, warn};

use pulse_domain::{ExecutionState, RunRecord, TabId, TabUpdate};

use crate::error::{ApplicationError, ApplicationResult, EnvelopeResultExt};
use crate::ports::{Clock, RequestService};
use crate::tab_store::SharedTabStore;

/// Message recorded when the executor reports a failure without a message.
const REMOTE_FAILURE_FALLBACK: &str = "The request could not be executed";

/// Use case for executing persisted requests.
///
/// # Example
///
/// ```ignore
/// let use_case = ExecuteRequest::new(store, service, clock);
/// let run = use_case.execute_active().await?;
/// ```
pub struct ExecuteRequest {
    store: SharedTabStore,
    service: Arc<dyn RequestService>,
    clock: Arc<dyn Clock>,
}

impl ExecuteRequest {
    /// Creates a new `ExecuteRequest` use case.
    pub fn new(
        store: SharedTabStore,
        service: Arc<dyn RequestService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            service,
            clock,
        }
    }

    /// Executes whichever tab is active.
    ///
    /// # Errors
    ///
    /// `NoActiveTab` if nothing is open, otherwise as [`Self::execute`].
    pub async fn execute_active(&self) -> ApplicationResult<RunRecord> {
        let id = self
            .store
            .read()
            .active_id()
            .cloned()
            .ok_or(ApplicationError::NoActiveTab)?;
        self.execute(&id).await
    }

    /// Executes one tab and records its run.
    ///
    /// # Gating
    ///
    /// - The tab must be open
    /// - The tab must be saved to a collection
    /// - No other execution of the tab may be in flight
    ///
    /// Refusals happen before any network call and leave the tab untouched.
    ///
    /// # Errors
    ///
    /// Returns the refusal, or the remote/transport failure after its
    /// synthesized run has been recorded.
    pub async fn execute(&self, id: &TabId) -> ApplicationResult<RunRecord> {
        self.begin(id)?;
        let pending = PendingGuard {
            store: &self.store,
            id,
            armed: true,
        };

        let result = self.service.execute_request(id).await.into_data();
        pending.disarm();

        let (run, state, outcome) = match result {
            Ok(run) => (run.clone(), ExecutionState::Succeeded, Ok(run)),
            Err(ApplicationError::Transport(err)) => {
                let message = format!("Could not reach the request executor: {err}");
                let run = RunRecord::failure(Some(id.to_string()), &message, self.clock.now());
                (
                    run,
                    ExecutionState::TransportFailed { message },
                    Err(ApplicationError::Transport(err)),
                )
            }
            Err(err) => {
                let message = match &err {
                    ApplicationError::Remote(message) if !message.trim().is_empty() => {
                        message.clone()
                    }
                    _ => REMOTE_FAILURE_FALLBACK.to_string(),
                };
                let run = RunRecord::failure(Some(id.to_string()), &message, self.clock.now());
                (run, ExecutionState::RemoteFailed { message }, Err(err))
            }
        };

        self.record(id, run, state);
        outcome
    }

    fn begin(&self, id: &TabId) -> ApplicationResult<()> {
        let mut store = self.store.write();
        let tab = store
            .tab(id)
            .ok_or_else(|| ApplicationError::TabNotOpen(id.clone()))?;
        if !tab.is_saved() {
            return Err(ApplicationError::Unsaved("run it"));
        }
        if tab.execution.is_pending() {
            return Err(ApplicationError::AlreadyPending);
        }
        store.update_tab(id, TabUpdate::ExecutionStarted);
        Ok(())
    }

    fn record(&self, id: &TabId, run: RunRecord, state: ExecutionState) {
        let mut store = self.store.write();
        let elapsed_ms = store
            .tab(id)
            .and_then(|tab| tab.execution.elapsed())
            .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        match &state {
            ExecutionState::Succeeded => {
                info!(tab = %id, status = run.status, elapsed_ms, "request executed");
            }
            other => {
                warn!(
                    tab = %id,
                    error = other.failure_message().unwrap_or_default(),
                    elapsed_ms,
                    "request execution failed"
                );
            }
        }
        // A tab closed mid-flight is simply gone; the store ignores the update.
        store.update_tab(id, TabUpdate::RunRecorded { run, state });
    }
}

/// Clears the `Pending` state if an execution future is dropped before
/// its outcome is recorded.
struct PendingGuard<'a> {
    store: &'a SharedTabStore,
    id: &'a TabId,
    armed: bool,
}

impl PendingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(tab = %self.id, "execution dropped while in flight");
            self.store
                .write()
                .update_tab(self.id, TabUpdate::ExecutionAbandoned);
        }
    }
}
