//! Uniform response envelope of the request service.

use serde::{Deserialize, Serialize};

/// Envelope every request-service call answers with.
///
/// `success: false` is a recoverable, user-notifiable failure carrying the
/// service's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEnvelope<T> {
    /// Whether the service performed the operation.
    pub success: bool,
    /// Human-readable outcome message.
    #[serde(default)]
    pub message: String,
    /// Payload, present on success for calls that return data.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ServiceEnvelope<T> {
    /// Creates a successful envelope with a payload.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Creates a successful envelope without a payload.
    #[must_use]
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a failure envelope.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
