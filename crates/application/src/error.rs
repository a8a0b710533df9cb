//! Application error types

use thiserror::Error;
use pulse_domain::{DomainError, Notice, ServiceEnvelope, TabId};

use crate::ports::{ServiceResult, TransportError};

/// Application-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// Local validation failed (malformed body, blank required field).
    #[error("{0}")]
    Validation(#[from] DomainError),

    /// The tab is not bound to a collection yet.
    #[error("Save this request to a collection before you {0}")]
    Unsaved(&'static str),

    /// The tab is already persisted, so it cannot be promoted again.
    #[error("This request is already saved")]
    AlreadySaved,

    /// An execution for this tab is still in flight.
    #[error("This request is already running")]
    AlreadyPending,

    /// There is no active tab to act on.
    #[error("No request is open")]
    NoActiveTab,

    /// The referenced tab is not open anymore.
    #[error("Tab {0} is not open")]
    TabNotOpen(TabId),

    /// The service answered with a failure envelope.
    #[error("{0}")]
    Remote(String),

    /// The call to the service failed.
    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl ApplicationError {
    /// Converts this error to the notice shown to the user, if any.
    ///
    /// A missing active tab is silent; everything else is surfaced.
    #[must_use]
    pub fn to_notice(&self) -> Option<Notice> {
        match self {
            Self::NoActiveTab => None,
            Self::Validation(_) | Self::Unsaved(_) | Self::AlreadySaved | Self::TabNotOpen(_) => {
                Some(Notice::warning(self.to_string()))
            }
            Self::AlreadyPending => Some(Notice::info(self.to_string())),
            Self::Remote(_) | Self::Transport(_) => Some(Notice::error(self.to_string())),
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Extension trait for unpacking service envelopes.
pub trait EnvelopeResultExt<T> {
    /// Returns the payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// `Remote` for `success: false` or a missing payload, `Transport` when
    /// the call failed.
    fn into_data(self) -> ApplicationResult<T>;

    /// Checks that the envelope reports success, discarding any payload.
    ///
    /// # Errors
    ///
    /// `Remote` for `success: false`, `Transport` when the call failed.
    fn into_done(self) -> ApplicationResult<()>;
}

impl<T> EnvelopeResultExt<T> for ServiceResult<T> {
    fn into_data(self) -> ApplicationResult<T> {
        let ServiceEnvelope {
            success,
            message,
            data,
        } = self?;
        if !success {
            return Err(ApplicationError::Remote(message));
        }
        data.ok_or_else(|| {
            ApplicationError::Remote(if message.is_empty() {
                "The service returned no data".to_string()
            } else {
                message
            })
        })
    }

    fn into_done(self) -> ApplicationResult<()> {
        let envelope = self?;
        if envelope.success {
            Ok(())
        } else {
            Err(ApplicationError::Remote(envelope.message))
        }
    }
}
