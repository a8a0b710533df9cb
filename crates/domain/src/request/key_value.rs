//! Key-value pairs shared by headers and query parameters

use serde::{Deserialize, Serialize};

/// A committed key-value pair as stored on a request.
///
/// Duplicate keys are allowed and order is preserved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// The header name or parameter key
    pub key: String,
    /// The header or parameter value
    pub value: String,
}

impl KeyValue {
    /// Creates a new pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An editable row in a key-value editor.
///
/// Supports enable/disable without deletion for editor convenience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueRow {
    /// The key being edited
    pub key: String,
    /// The value being edited
    pub value: String,
    /// Whether this row takes part in the committed set
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl KeyValueRow {
    /// Creates a new enabled row.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates the blank row an editor shows when it has nothing else.
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", "")
    }

    /// Creates a disabled row.
    #[must_use]
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: false,
        }
    }

    /// Returns true if both key and value are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.key.trim().is_empty() && self.value.trim().is_empty()
    }

    /// Returns the committed pair if this row should be committed.
    #[must_use]
    pub fn committable(&self) -> Option<KeyValue> {
        (self.enabled && !self.is_blank()).then(|| KeyValue::new(&self.key, &self.value))
    }
}

impl From<KeyValue> for KeyValueRow {
    fn from(pair: KeyValue) -> Self {
        Self::new(pair.key, pair.value)
    }
}

/// Filters editor rows down to the pairs that get committed.
///
/// Keeps only enabled rows with a non-blank key or value, in order.
#[must_use]
pub fn committable_pairs(rows: &[KeyValueRow]) -> Vec<KeyValue> {
    rows.iter().filter_map(KeyValueRow::committable).collect()
}

/// Builds editor rows from committed pairs, always yielding at least one row.
#[must_use]
pub fn rows_from_pairs(pairs: &[KeyValue]) -> Vec<KeyValueRow> {
    if pairs.is_empty() {
        return vec![KeyValueRow::blank()];
    }
    pairs.iter().cloned().map(KeyValueRow::from).collect()
}
