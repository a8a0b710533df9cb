//! Tab identity and ID generation utilities.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Prefix used for placeholder ids of requests that were never persisted.
pub const SYNTHETIC_PREFIX: &str = "tmp-";

/// Identity of an open tab.
///
/// For a persisted request this is the request's durable primary key. For a
/// new request that has not been saved yet it is a locally generated
/// placeholder such as `tmp-1`. Whether a tab is saved is tracked by its
/// save state, never by the shape of its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    /// Wraps a durable id issued by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank.
    pub fn persisted(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(id));
        }
        Ok(Self(id))
    }

    /// Builds the placeholder id for the `n`th unsaved tab of a store.
    #[must_use]
    pub fn synthetic(n: u64) -> Self {
        Self(format!("{SYNTHETIC_PREFIX}{n}"))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TabId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generates a new time-ordered UUID v7 as a string.
#[must_use]
pub fn generate_id_v7() -> String {
    Uuid::now_v7().to_string()
}
