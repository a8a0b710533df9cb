//! Execution state of a tab, for binding the send control.
//!
//! A single execution moves `Idle -> Pending -> (Succeeded | RemoteFailed |
//! TransportFailed)`. There is no retry state; a new execution starts over.

use serde::{Deserialize, Serialize};

/// Represents where a tab is in its most recent execution.
///
/// The send control is disabled while `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExecutionState {
    /// Nothing has been executed yet.
    #[default]
    Idle,

    /// An execution is in flight.
    Pending {
        /// When the execution started (for elapsed time display).
        /// Skipped in serialization as Instant is not serializable.
        #[serde(skip)]
        started_at: Option<std::time::Instant>,
    },

    /// The executor returned a run record.
    Succeeded,

    /// The executor answered with a failure envelope.
    RemoteFailed {
        /// Message provided by the service.
        message: String,
    },

    /// The call to the executor itself failed.
    TransportFailed {
        /// Client-side failure message.
        message: String,
    },
}

impl ExecutionState {
    /// Creates a new Pending state with the current timestamp.
    #[must_use]
    pub fn pending() -> Self {
        Self::Pending {
            started_at: Some(std::time::Instant::now()),
        }
    }

    /// Returns true if an execution is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Returns the failure message of a failed execution.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::RemoteFailed { message } | Self::TransportFailed { message } => Some(message),
            _ => None,
        }
    }

    /// Returns the elapsed time if pending.
    #[must_use]
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        match self {
            Self::Pending {
                started_at: Some(t),
            } => Some(t.elapsed()),
            _ => None,
        }
    }
}
