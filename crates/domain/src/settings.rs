//! Client Settings Domain Model
//!
//! Defines how the workbench reaches the PulseAPI backend and paces commits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the request workbench.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the PulseAPI backend.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Workspace new requests are created in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    /// Settle time before key-value and URL edits are committed.
    #[serde(default = "default_commit_debounce_ms")]
    pub commit_debounce_ms: u64,

    /// Timeout for calls to the backend.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_commit_debounce_ms() -> u64 {
    500
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl ClientSettings {
    /// Returns the commit debounce as a duration.
    #[must_use]
    pub const fn commit_debounce(&self) -> Duration {
        Duration::from_millis(self.commit_debounce_ms)
    }

    /// Returns the backend call timeout as a duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            workspace_id: None,
            commit_debounce_ms: default_commit_debounce_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            log_filter: default_log_filter(),
        }
    }
}
