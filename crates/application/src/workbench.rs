//! The request workbench.
//!
//! Wires the tab store, synchronizer, execution pipeline, editors and
//! save/lifecycle use cases to one request service. This is the boundary
//! where failures end: every error is turned into a [`Notice`] and the
//! caller only sees whether the action took effect.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use pulse_domain::{
    ClientSettings, KeyValue, Notice, PersistedRequest, RequestUpdate, RunRecord, Tab, TabId,
    TabUpdate,
};

use crate::editors::{BodyEditor, CommitFn, CommitFuture, KeyValueEditor, UrlEditor, UrlTarget};
use crate::error::{ApplicationError, ApplicationResult, EnvelopeResultExt};
use crate::execute_request::ExecuteRequest;
use crate::ports::{Clock, Notifier, RequestService};
use crate::sync::{ActiveTabSynchronizer, SyncOutcome};
use crate::tab_store::{ActiveTicket, SharedTabStore, TabStore};
use crate::use_cases::{
    CreateRequest, CreateRequestInput, DeleteOutcome, DeleteRequest, QuickSave, UpdateRequest,
    UpdateRequestInput,
};

/// Where to save an unsaved tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    /// Target workspace; falls back to the configured workspace.
    pub workspace_id: Option<String>,
    /// Target collection.
    pub collection_id: String,
    /// Name for the new request.
    pub name: String,
}

/// Which key-value field of a tab an editor is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyValueField {
    Headers,
    QueryParams,
}

impl KeyValueField {
    fn update(self, pairs: Vec<KeyValue>) -> TabUpdate {
        match self {
            Self::Headers => TabUpdate::Headers(pairs),
            Self::QueryParams => TabUpdate::QueryParams(pairs),
        }
    }
}

/// Facade over the request-editor core.
pub struct Workbench {
    store: SharedTabStore,
    service: Arc<dyn RequestService>,
    notifier: Arc<dyn Notifier>,
    settings: ClientSettings,
    synchronizer: Arc<ActiveTabSynchronizer>,
    executor: ExecuteRequest,
}

impl Workbench {
    /// Creates a workbench with an empty tab store.
    pub fn new(
        service: Arc<dyn RequestService>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: ClientSettings,
    ) -> Self {
        Self::with_store(TabStore::shared(), service, notifier, clock, settings)
    }

    /// Creates a workbench over an existing store.
    pub fn with_store(
        store: SharedTabStore,
        service: Arc<dyn RequestService>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: ClientSettings,
    ) -> Self {
        let synchronizer = Arc::new(ActiveTabSynchronizer::new(
            store.clone(),
            Arc::clone(&service),
        ));
        let executor = ExecuteRequest::new(store.clone(), Arc::clone(&service), clock);
        Self {
            store,
            service,
            notifier,
            settings,
            synchronizer,
            executor,
        }
    }

    /// Returns the shared tab store.
    #[must_use]
    pub const fn store(&self) -> &SharedTabStore {
        &self.store
    }

    /// Returns the settings the workbench was built with.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Returns a snapshot of a tab.
    #[must_use]
    pub fn tab(&self, id: &TabId) -> Option<Tab> {
        self.store.read().tab(id).cloned()
    }

    /// Returns a snapshot of the active tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<Tab> {
        self.store.read().active_tab().cloned()
    }

    /// Subscribes to activations.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<ActiveTicket>> {
        self.store.read().subscribe()
    }

    /// Starts syncing every activation in the background.
    pub fn start_sync(&self) -> JoinHandle<()> {
        Arc::clone(&self.synchronizer).spawn()
    }

    /// Syncs the active tab now and reports a failed fetch.
    pub async fn sync_active(&self) -> SyncOutcome {
        let outcome = self.synchronizer.sync_active().await;
        if let SyncOutcome::Failed(err) = &outcome {
            self.notify_error(err);
        }
        outcome
    }

    // --- Tab lifecycle ---

    /// Opens a fresh unsaved tab.
    pub fn new_request(&self) -> TabId {
        self.store.write().open_new_tab()
    }

    /// Opens a persisted request, or re-activates it if already open.
    pub async fn open_existing(&self, id: &str) -> Option<TabId> {
        let id = self.report(TabId::persisted(id).map_err(ApplicationError::from))?;
        if self.store.write().set_active_tab(&id) {
            return Some(id);
        }
        let details = self.report(self.service.fetch_request_details(&id).await.into_data())?;
        self.store
            .write()
            .open_tab(Tab::from_persisted(id.clone(), details));
        Some(id)
    }

    /// Activates an open tab.
    pub fn activate(&self, id: &TabId) -> bool {
        self.store.write().set_active_tab(id)
    }

    /// Closes a tab without touching its persisted request.
    pub fn close(&self, id: &TabId) -> bool {
        self.store.write().close_tab(id)
    }

    // --- Actions ---

    /// Executes the active tab.
    pub async fn execute_active(&self) -> Option<RunRecord> {
        let result = self.executor.execute_active().await;
        self.report(result)
    }

    /// Saves the active unsaved tab to a collection.
    ///
    /// Returns the durable id the tab was swapped to.
    pub async fn save_active(&self, target: SaveTarget) -> Option<TabId> {
        let tab_id = self.require_active()?;
        let workspace_id = target
            .workspace_id
            .filter(|id| !id.trim().is_empty())
            .or_else(|| self.settings.workspace_id.clone())
            .unwrap_or_default();
        let result = CreateRequest::new(self.store.clone(), Arc::clone(&self.service))
            .execute(CreateRequestInput {
                tab_id,
                workspace_id,
                collection_id: target.collection_id,
                name: target.name,
            })
            .await;
        let output = self.report(result)?;
        self.notifier
            .notify(Notice::success(format!("Saved \"{}\"", output.request.details.name)));
        Some(output.tab_id)
    }

    /// Renames the active saved tab and optionally moves it.
    pub async fn update_active(
        &self,
        name: impl Into<String>,
        collection_id: Option<String>,
    ) -> Option<PersistedRequest> {
        let tab_id = self.require_active()?;
        let result = UpdateRequest::new(self.store.clone(), Arc::clone(&self.service))
            .execute(UpdateRequestInput {
                tab_id,
                name: name.into(),
                collection_id,
            })
            .await;
        let request = self.report(result)?;
        self.notifier.notify(Notice::success("Request updated"));
        Some(request)
    }

    /// Deletes the request behind a tab and closes it.
    pub async fn delete(&self, id: &TabId) -> Option<DeleteOutcome> {
        let result = DeleteRequest::new(self.store.clone(), Arc::clone(&self.service))
            .execute(id)
            .await;
        let outcome = self.report(result)?;
        if outcome == DeleteOutcome::Deleted {
            self.notifier.notify(Notice::success("Request deleted"));
        }
        Some(outcome)
    }

    /// Commits every field of the active saved tab.
    pub async fn quick_save_active(&self) -> bool {
        let Some(tab_id) = self.require_active() else {
            return false;
        };
        let result = QuickSave::new(self.store.clone(), Arc::clone(&self.service))
            .execute(&tab_id)
            .await;
        let saved = self.report(result).is_some();
        if saved {
            self.notifier.notify(Notice::success("All changes saved"));
        }
        saved
    }

    // --- Editors ---

    /// Creates a header editor bound to a tab.
    pub fn header_editor(&self, id: &TabId) -> Option<KeyValueEditor> {
        let headers = self.store.read().tab(id)?.headers.clone();
        Some(KeyValueEditor::new(
            &headers,
            self.settings.commit_debounce(),
            self.key_value_commit(id.clone(), KeyValueField::Headers),
        ))
    }

    /// Creates a query parameter editor bound to a tab.
    pub fn query_param_editor(&self, id: &TabId) -> Option<KeyValueEditor> {
        let params = self.store.read().tab(id)?.query_params.clone();
        Some(KeyValueEditor::new(
            &params,
            self.settings.commit_debounce(),
            self.key_value_commit(id.clone(), KeyValueField::QueryParams),
        ))
    }

    /// Creates a URL and method editor bound to a tab.
    pub fn url_editor(&self, id: &TabId) -> Option<UrlEditor> {
        let target = {
            let store = self.store.read();
            let tab = store.tab(id)?;
            UrlTarget {
                url: tab.url.clone(),
                method: tab.method,
            }
        };
        Some(UrlEditor::new(
            target,
            self.settings.commit_debounce(),
            self.url_commit(id.clone()),
        ))
    }

    /// Creates a body editor over a tab's body.
    pub fn body_editor(&self, id: &TabId) -> Option<BodyEditor> {
        let store = self.store.read();
        let tab = store.tab(id)?;
        Some(BodyEditor::new(
            tab.content_type,
            tab.body.clone().unwrap_or_default(),
        ))
    }

    /// Pretty-prints the editor's JSON, reporting a parse failure.
    pub fn format_body(&self, editor: &mut BodyEditor) -> bool {
        self.report(editor.format().map_err(ApplicationError::from))
            .is_some()
    }

    /// Saves the body editor's content into a tab.
    ///
    /// A malformed JSON body blocks the save. Saved tabs also commit the
    /// body to the service.
    pub async fn save_body(&self, id: &TabId, editor: &mut BodyEditor) -> bool {
        let result = self.commit_body(id, editor).await;
        let saved = self.report(result).is_some();
        if saved {
            self.notifier.notify(Notice::success("Body saved"));
        }
        saved
    }

    async fn commit_body(&self, id: &TabId, editor: &mut BodyEditor) -> ApplicationResult<()> {
        let content = editor.prepare_save()?;
        let saved = {
            let mut store = self.store.write();
            let update = TabUpdate::Body {
                content: Some(content.clone()),
                content_type: editor.content_type(),
            };
            if !store.update_tab(id, update) {
                return Err(ApplicationError::TabNotOpen(id.clone()));
            }
            store.tab(id).is_some_and(Tab::is_saved)
        };
        if saved {
            self.service.commit_body(id, &content).await.into_done()?;
        }
        Ok(())
    }

    fn key_value_commit(&self, tab_id: TabId, field: KeyValueField) -> CommitFn<Vec<KeyValue>> {
        let store = self.store.clone();
        let service = Arc::clone(&self.service);
        let notifier = Arc::clone(&self.notifier);
        Arc::new(move |pairs: Vec<KeyValue>| -> CommitFuture {
            let store = store.clone();
            let service = Arc::clone(&service);
            let notifier = Arc::clone(&notifier);
            let tab_id = tab_id.clone();
            Box::pin(async move {
                let saved = {
                    let mut store = store.write();
                    if !store.update_tab(&tab_id, field.update(pairs.clone())) {
                        return false;
                    }
                    store.tab(&tab_id).is_some_and(Tab::is_saved)
                };
                if !saved {
                    return true;
                }
                let result = match field {
                    KeyValueField::Headers => service.commit_headers(&tab_id, &pairs).await,
                    KeyValueField::QueryParams => {
                        service.commit_query_params(&tab_id, &pairs).await
                    }
                };
                report_to(notifier.as_ref(), result.into_done()).is_some()
            })
        })
    }

    fn url_commit(&self, tab_id: TabId) -> CommitFn<UrlTarget> {
        let store = self.store.clone();
        let service = Arc::clone(&self.service);
        let notifier = Arc::clone(&self.notifier);
        Arc::new(move |target: UrlTarget| -> CommitFuture {
            let store = store.clone();
            let service = Arc::clone(&service);
            let notifier = Arc::clone(&notifier);
            let tab_id = tab_id.clone();
            Box::pin(async move {
                let update = {
                    let mut store = store.write();
                    let changed = store.update_tab(
                        &tab_id,
                        TabUpdate::UrlAndMethod {
                            url: target.url.clone(),
                            method: target.method,
                        },
                    );
                    if !changed {
                        return false;
                    }
                    match store.tab(&tab_id) {
                        Some(tab) if tab.is_saved() => RequestUpdate {
                            id: tab_id.to_string(),
                            name: tab.name.clone(),
                            url: target.url,
                            method: target.method,
                            collection_id: None,
                        },
                        _ => return true,
                    }
                };
                let result = service.update_request(&update).await.into_data();
                report_to(notifier.as_ref(), result).is_some()
            })
        })
    }

    fn require_active(&self) -> Option<TabId> {
        let active = self.store.read().active_id().cloned();
        self.report(active.ok_or(ApplicationError::NoActiveTab))
    }

    fn report<T>(&self, result: ApplicationResult<T>) -> Option<T> {
        report_to(self.notifier.as_ref(), result)
    }

    fn notify_error(&self, err: &ApplicationError) {
        if let Some(notice) = err.to_notice() {
            self.notifier.notify(notice);
        }
    }
}

fn report_to<T>(notifier: &dyn Notifier, result: ApplicationResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(error = %err, "action did not take effect");
            if let Some(notice) = err.to_notice() {
                notifier.notify(notice);
            }
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{
        Call, FixedClock, MockRequestService, RecordingNotifier, details, transport_error,
    };
    use pretty_assertions::assert_eq;
    use pulse_domain::{BodyContentType, HttpMethod, NoticeLevel, ServiceEnvelope};
    use std::time::Duration;

    fn workbench() -> (Workbench, Arc<MockRequestService>, Arc<RecordingNotifier>) {
        let service = Arc::new(MockRequestService::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let settings = ClientSettings {
            workspace_id: Some("ws-1".to_string()),
            ..ClientSettings::default()
        };
        let workbench = Workbench::new(
            service.clone(),
            notifier.clone(),
            Arc::new(FixedClock),
            settings,
        );
        (workbench, service, notifier)
    }

    fn levels(notifier: &RecordingNotifier) -> Vec<NoticeLevel> {
        notifier.notices().iter().map(|n| n.level).collect()
    }

    #[tokio::test]
    async fn test_execute_unsaved_notifies_and_makes_no_calls() {
        let (workbench, service, notifier) = workbench();
        workbench.new_request();

        assert_eq!(workbench.execute_active().await, None);

        assert_eq!(service.call_count(), 0);
        assert_eq!(levels(&notifier), vec![NoticeLevel::Warning]);
        assert_eq!(workbench.active_tab().unwrap().last_run, None);
    }

    #[tokio::test]
    async fn test_execute_with_no_tab_is_silent() {
        let (workbench, service, notifier) = workbench();
        assert_eq!(workbench.execute_active().await, None);
        assert_eq!(service.call_count(), 0);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_save_uses_configured_workspace() {
        let (workbench, service, notifier) = workbench();
        workbench.new_request();

        let id = workbench
            .save_active(SaveTarget {
                workspace_id: None,
                collection_id: "col-42".to_string(),
                name: "Get Users".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(id.as_str(), "req-7");
        let Call::Create(sent) = &service.calls()[0] else {
            panic!("expected a create call");
        };
        assert_eq!(sent.workspace_id, "ws-1");
        assert_eq!(levels(&notifier), vec![NoticeLevel::Success]);
    }

    #[tokio::test]
    async fn test_blank_workspace_falls_back_to_configured_one() {
        let (workbench, service, _) = workbench();
        workbench.new_request();

        workbench
            .save_active(SaveTarget {
                workspace_id: Some("  ".to_string()),
                collection_id: "col-42".to_string(),
                name: "Get Users".to_string(),
            })
            .await
            .unwrap();

        let Call::Create(sent) = &service.calls()[0] else {
            panic!("expected a create call");
        };
        assert_eq!(sent.workspace_id, "ws-1");
    }

    #[tokio::test]
    async fn test_open_existing_fetches_once_and_reuses_tab() {
        let (workbench, service, _) = workbench();
        service.set_details("req-1", details("req-1", "col-1"));

        let first = workbench.open_existing("req-1").await.unwrap();
        workbench.new_request();
        let second = workbench.open_existing("req-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.calls(), vec![Call::Fetch("req-1".to_string())]);
        assert_eq!(workbench.store().read().len(), 2);
        assert_eq!(workbench.store().read().active_id(), Some(&first));
    }

    #[tokio::test]
    async fn test_open_existing_failure_notifies() {
        let (workbench, _, notifier) = workbench();
        assert_eq!(workbench.open_existing("missing").await, None);
        assert_eq!(levels(&notifier), vec![NoticeLevel::Error]);
        assert!(workbench.store().read().is_empty());
    }

    #[tokio::test]
    async fn test_quick_save_unsaved_is_refused() {
        let (workbench, service, notifier) = workbench();
        workbench.new_request();

        assert!(!workbench.quick_save_active().await);
        assert_eq!(service.call_count(), 0);
        assert_eq!(levels(&notifier), vec![NoticeLevel::Warning]);
    }

    #[tokio::test]
    async fn test_sync_failure_notifies() {
        let (workbench, _, notifier) = workbench();
        workbench.store().write().open_tab(Tab::from_persisted(
            TabId::persisted("req-1").unwrap(),
            details("req-1", "col-1"),
        ));

        assert!(matches!(
            workbench.sync_active().await,
            SyncOutcome::Failed(_)
        ));
        assert_eq!(levels(&notifier), vec![NoticeLevel::Error]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_header_editor_commits_for_saved_tab() {
        let (workbench, service, _) = workbench();
        service.set_details("req-1", details("req-1", "col-1"));
        let id = workbench.open_existing("req-1").await.unwrap();

        let mut editor = workbench.header_editor(&id).unwrap();
        editor.edit_row(0, "Authorization", "Bearer t");
        editor.settle().await;

        let expected = vec![KeyValue::new("Authorization", "Bearer t")];
        assert_eq!(workbench.tab(&id).unwrap().headers, expected);
        assert!(service.calls().contains(&Call::Headers("req-1".to_string(), expected)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_param_editor_on_unsaved_tab_stays_local() {
        let (workbench, service, _) = workbench();
        let id = workbench.new_request();

        let mut editor = workbench.query_param_editor(&id).unwrap();
        editor.edit_row(0, "page", "2");
        editor.settle().await;

        assert_eq!(
            workbench.tab(&id).unwrap().query_params,
            vec![KeyValue::new("page", "2")]
        );
        assert_eq!(service.call_count(), 0);
        assert_eq!(editor.last_committed(), vec![KeyValue::new("page", "2")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_header_commit_notifies_and_retries() {
        let (workbench, service, notifier) = workbench();
        service.set_details("req-1", details("req-1", "col-1"));
        let id = workbench.open_existing("req-1").await.unwrap();
        service.respond_commits(Err(transport_error("offline")));

        let mut editor = workbench.header_editor(&id).unwrap();
        editor.edit_row(0, "X-Id", "1");
        editor.settle().await;

        assert!(editor.last_committed().is_empty());
        assert_eq!(levels(&notifier), vec![NoticeLevel::Error]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_header_commit_keeps_final_headers() {
        let (workbench, service, _) = workbench();
        service.set_details("req-1", details("req-1", "col-1"));
        let id = workbench.open_existing("req-1").await.unwrap();
        let release = service.gate_next_commit();

        let mut editor = workbench.header_editor(&id).unwrap();
        editor.edit_row(0, "X-Id", "1");
        tokio::time::sleep(Duration::from_millis(600)).await;
        editor.edit_row(0, "X-Id", "2");
        tokio::time::sleep(Duration::from_millis(600)).await;
        release.send(()).unwrap();
        editor.settle().await;
        editor.edit_row(0, "X-Id", "1");
        editor.settle().await;

        let expected = vec![KeyValue::new("X-Id", "1")];
        assert_eq!(workbench.tab(&id).unwrap().headers, expected);
        assert_eq!(editor.last_committed(), expected);
        assert_eq!(
            service.calls().last(),
            Some(&Call::Headers("req-1".to_string(), expected))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_url_editor_commits_metadata() {
        let (workbench, service, _) = workbench();
        service.set_details("req-1", details("req-1", "col-1"));
        let id = workbench.open_existing("req-1").await.unwrap();

        let mut editor = workbench.url_editor(&id).unwrap();
        editor.set_url("https://api.example.com/v2/users");
        editor.set_method(HttpMethod::Delete);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(editor.is_pending());
        editor.settle().await;

        let tab = workbench.tab(&id).unwrap();
        assert_eq!(tab.url, "https://api.example.com/v2/users");
        assert_eq!(tab.method, HttpMethod::Delete);
        let updates: Vec<_> = service
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Update(_)))
            .collect();
        assert_eq!(updates.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_body_is_not_saved() {
        let (workbench, service, notifier) = workbench();
        service.set_details("req-1", details("req-1", "col-1"));
        let id = workbench.open_existing("req-1").await.unwrap();

        let mut editor = workbench.body_editor(&id).unwrap();
        editor.set_text("{ \"a\": ");
        assert!(!workbench.format_body(&mut editor));
        assert_eq!(editor.text(), "{ \"a\": ");
        assert!(!workbench.save_body(&id, &mut editor).await);

        assert_eq!(workbench.tab(&id).unwrap().body, None);
        assert!(!service.calls().iter().any(|c| matches!(c, Call::Body(..))));
        assert_eq!(
            levels(&notifier),
            vec![NoticeLevel::Warning, NoticeLevel::Warning]
        );
    }

    #[tokio::test]
    async fn test_body_save_minifies_and_commits() {
        let (workbench, service, _) = workbench();
        service.set_details("req-1", details("req-1", "col-1"));
        let id = workbench.open_existing("req-1").await.unwrap();

        let mut editor = workbench.body_editor(&id).unwrap();
        editor.set_text("{\n  \"a\": [1, 2]\n}");
        assert!(workbench.save_body(&id, &mut editor).await);

        let tab = workbench.tab(&id).unwrap();
        assert_eq!(tab.body.as_deref(), Some("{\"a\":[1,2]}"));
        assert_eq!(tab.content_type, BodyContentType::Json);
        assert!(service
            .calls()
            .contains(&Call::Body("req-1".to_string(), "{\"a\":[1,2]}".to_string())));
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_tab_and_notifies() {
        let (workbench, service, notifier) = workbench();
        service.set_details("req-1", details("req-1", "col-1"));
        let id = workbench.open_existing("req-1").await.unwrap();
        service.respond_delete(Ok(ServiceEnvelope::failed("Forbidden")));

        assert_eq!(workbench.delete(&id).await, None);
        assert!(workbench.tab(&id).is_some());
        assert_eq!(levels(&notifier), vec![NoticeLevel::Error]);
    }
}
