//! Key-value editor for headers and query parameters.

use std::time::Duration;

use pulse_domain::request::{committable_pairs, rows_from_pairs};
use pulse_domain::{KeyValue, KeyValueRow};

use super::commit::{CommitFn, DebouncedCommit};

/// Edits an ordered list of key-value rows bound to one tab field.
///
/// At least one row is always present. Every change schedules a debounced
/// commit of the enabled, non-blank rows.
pub struct KeyValueEditor {
    rows: Vec<KeyValueRow>,
    committer: DebouncedCommit<Vec<KeyValue>>,
}

impl KeyValueEditor {
    /// Creates an editor over the currently committed pairs.
    pub fn new(committed: &[KeyValue], delay: Duration, commit: CommitFn<Vec<KeyValue>>) -> Self {
        Self {
            rows: rows_from_pairs(committed),
            committer: DebouncedCommit::new(committed.to_vec(), delay, commit),
        }
    }

    /// Returns the rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[KeyValueRow] {
        &self.rows
    }

    /// Returns the pairs the next commit would carry.
    #[must_use]
    pub fn committable(&self) -> Vec<KeyValue> {
        committable_pairs(&self.rows)
    }

    /// Appends a blank row.
    pub fn add_row(&mut self) {
        self.rows.push(KeyValueRow::blank());
        self.changed();
    }

    /// Replaces the key and value of a row.
    pub fn edit_row(&mut self, index: usize, key: impl Into<String>, value: impl Into<String>) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        row.key = key.into();
        row.value = value.into();
        self.changed();
        true
    }

    /// Enables or disables a row.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        row.enabled = enabled;
        self.changed();
        true
    }

    /// Flips the enabled flag of a row.
    pub fn toggle_row(&mut self, index: usize) -> bool {
        let enabled = match self.rows.get(index) {
            Some(row) => !row.enabled,
            None => return false,
        };
        self.set_enabled(index, enabled)
    }

    /// Removes a row. Removing the last remaining row is a no-op.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        self.changed();
        true
    }

    /// Returns true if a commit is still settling.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.committer.is_pending()
    }

    /// Returns the last accepted commit.
    #[must_use]
    pub fn last_committed(&self) -> Vec<KeyValue> {
        self.committer.last_committed()
    }

    /// Waits for the pending commit, if any.
    pub async fn settle(&mut self) {
        self.committer.settle().await;
    }

    fn changed(&mut self) {
        let pairs = self.committable();
        self.committer.submit(pairs);
    }
}
