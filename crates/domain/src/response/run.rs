//! Run record type

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id_v7;

/// Prefix for ids of run records synthesized on the client after a failure.
pub const ERROR_RUN_PREFIX: &str = "error-";

/// Result of the most recent execution of a request.
///
/// `error` being set signals a failure of the execution itself, distinct from
/// an HTTP error status returned by the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    /// Run id; persisted runs carry the backend id
    pub id: String,
    /// Request this run belongs to
    #[serde(default)]
    pub request_id: Option<String>,
    /// When the run was executed
    pub executed_at: DateTime<Utc>,
    /// HTTP status code, `0` when no response was obtained
    pub status: u16,
    /// Response body
    #[serde(default)]
    pub body: Option<String>,
    /// Response headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Time taken by the outbound call
    #[serde(rename = "durationMs", with = "duration_millis")]
    pub duration: Duration,
    /// Failure message, if the run failed
    #[serde(default)]
    pub error: Option<String>,
}

/// What the response viewer should render for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDisplay<'a> {
    /// The run failed; the message takes precedence over any status.
    Failed(&'a str),
    /// A response was received with this status.
    Response(u16),
}

impl RunRecord {
    /// Synthesizes a failed run so the viewer has a uniform shape to render.
    #[must_use]
    pub fn failure(
        request_id: Option<String>,
        message: impl Into<String>,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("{ERROR_RUN_PREFIX}{}", generate_id_v7()),
            request_id,
            executed_at,
            status: 0,
            body: None,
            headers: BTreeMap::new(),
            duration: Duration::ZERO,
            error: Some(message.into()),
        }
    }

    /// Returns true if this run was synthesized on the client.
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        self.id.starts_with(ERROR_RUN_PREFIX)
    }

    /// Returns what the viewer should show; an error always wins.
    #[must_use]
    pub fn display(&self) -> RunDisplay<'_> {
        match &self.error {
            Some(message) => RunDisplay::Failed(message),
            None => RunDisplay::Response(self.status),
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none() && self.status >= 200 && self.status < 300
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
