//! Request-editor tabs and the typed updates that mutate them.

use serde::{Deserialize, Serialize};

use crate::id::TabId;
use crate::request::{BodyContentType, HttpMethod, KeyValue, RequestDetails};
use crate::response::RunRecord;
use crate::state::ExecutionState;

/// Name given to tabs created with "new request".
pub const UNTITLED_REQUEST: &str = "Untitled Request";

/// Whether a tab is bound to a persisted collection.
///
/// Only saved tabs may be executed or quick-saved; unsaved tabs must be
/// promoted first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveState {
    /// Not yet assigned to a collection.
    #[default]
    Unsaved,
    /// Bound to a persisted collection.
    Saved {
        /// Owning collection.
        collection_id: String,
    },
}

impl SaveState {
    /// Maps a wire collection id onto a save state; blank means unsaved.
    #[must_use]
    pub fn from_collection_id(collection_id: &str) -> Self {
        if collection_id.trim().is_empty() {
            Self::Unsaved
        } else {
            Self::Saved {
                collection_id: collection_id.to_string(),
            }
        }
    }

    /// Returns the owning collection id, if saved.
    #[must_use]
    pub fn collection_id(&self) -> Option<&str> {
        match self {
            Self::Unsaved => None,
            Self::Saved { collection_id } => Some(collection_id),
        }
    }

    /// Returns true if bound to a collection.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// The unit of open-editor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Durable id for persisted requests, placeholder otherwise
    pub id: TabId,
    /// Human-readable name
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL
    pub url: String,
    /// Request headers in display order
    pub headers: Vec<KeyValue>,
    /// Query parameters in display order
    pub query_params: Vec<KeyValue>,
    /// Raw body, if any
    pub body: Option<String>,
    /// Declared body content type
    pub content_type: BodyContentType,
    /// Collection binding
    pub save_state: SaveState,
    /// Result of the most recent execution
    pub last_run: Option<RunRecord>,
    /// Execution progress
    #[serde(default)]
    pub execution: ExecutionState,
}

impl Tab {
    /// Creates a fresh unsaved tab for a "new request".
    #[must_use]
    pub fn unsaved(id: TabId) -> Self {
        Self {
            id,
            name: UNTITLED_REQUEST.to_string(),
            method: HttpMethod::Get,
            url: String::new(),
            headers: Vec::new(),
            query_params: Vec::new(),
            body: None,
            content_type: BodyContentType::Json,
            save_state: SaveState::Unsaved,
            last_run: None,
            execution: ExecutionState::Idle,
        }
    }

    /// Hydrates a tab from a persisted request.
    #[must_use]
    pub fn from_persisted(id: TabId, details: RequestDetails) -> Self {
        let mut tab = Self::unsaved(id);
        tab.apply(TabUpdate::Synced(details));
        tab
    }

    /// Returns true if the tab may be executed or quick-saved.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.save_state.is_saved()
    }

    /// Returns the owning collection id, if saved.
    #[must_use]
    pub fn collection_id(&self) -> Option<&str> {
        self.save_state.collection_id()
    }

    /// Applies a typed update to this tab.
    pub fn apply(&mut self, update: TabUpdate) {
        match update {
            TabUpdate::Rename(name) => self.name = name,
            TabUpdate::UrlAndMethod { url, method } => {
                self.url = url;
                self.method = method;
            }
            TabUpdate::Headers(headers) => self.headers = headers,
            TabUpdate::QueryParams(params) => self.query_params = params,
            TabUpdate::Body {
                content,
                content_type,
            } => {
                self.body = content.filter(|c| !c.is_empty());
                self.content_type = content_type;
            }
            TabUpdate::Synced(details) => {
                self.name = details.name;
                self.method = details.method;
                self.url = details.url;
                self.headers = details.headers;
                self.query_params = details.query_params;
                self.body = details.body.filter(|c| !c.is_empty());
                self.save_state = SaveState::from_collection_id(&details.collection_id);
            }
            TabUpdate::Relocated {
                name,
                collection_id,
            } => {
                self.name = name;
                self.save_state = SaveState::from_collection_id(&collection_id);
            }
            TabUpdate::ExecutionStarted => self.execution = ExecutionState::pending(),
            TabUpdate::ExecutionAbandoned => {
                if self.execution.is_pending() {
                    self.execution = ExecutionState::Idle;
                }
            }
            TabUpdate::RunRecorded { run, state } => {
                self.last_run = Some(run);
                self.execution = state;
            }
        }
    }
}

/// Closed set of changes a tab accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabUpdate {
    /// The tab was renamed locally.
    Rename(String),
    /// The URL/method editor changed.
    UrlAndMethod {
        /// New URL.
        url: String,
        /// New method.
        method: HttpMethod,
    },
    /// The header editor settled on a new set.
    Headers(Vec<KeyValue>),
    /// The query parameter editor settled on a new set.
    QueryParams(Vec<KeyValue>),
    /// The body editor saved.
    Body {
        /// New body; empty means no body.
        content: Option<String>,
        /// Declared content type.
        content_type: BodyContentType,
    },
    /// Authoritative fields fetched from the request service.
    Synced(RequestDetails),
    /// A persisted request was renamed or moved.
    Relocated {
        /// Server-confirmed name.
        name: String,
        /// Server-confirmed collection.
        collection_id: String,
    },
    /// An execution was issued.
    ExecutionStarted,
    /// An in-flight execution was dropped before it resolved.
    ExecutionAbandoned,
    /// An execution terminated.
    RunRecorded {
        /// Run to show in the response viewer.
        run: RunRecord,
        /// Terminal execution state.
        state: ExecutionState,
    },
}
