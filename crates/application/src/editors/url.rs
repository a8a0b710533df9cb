//! URL and method editor.

use std::time::Duration;

use pulse_domain::HttpMethod;

use super::commit::{CommitFn, DebouncedCommit};

/// URL and method as committed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTarget {
    /// Target URL
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
}

/// Edits the URL and method of one tab.
///
/// Method changes are committed with the same settle time as URL typing so
/// a quick method switch while typing produces a single write.
pub struct UrlEditor {
    current: UrlTarget,
    committer: DebouncedCommit<UrlTarget>,
}

impl UrlEditor {
    /// Creates an editor over the committed URL and method.
    pub fn new(committed: UrlTarget, delay: Duration, commit: CommitFn<UrlTarget>) -> Self {
        Self {
            current: committed.clone(),
            committer: DebouncedCommit::new(committed, delay, commit),
        }
    }

    /// Returns the URL being edited.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.current.url
    }

    /// Returns the method being edited.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.current.method
    }

    /// Replaces the URL.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.current.url = url.into();
        self.committer.submit(self.current.clone());
    }

    /// Replaces the method.
    pub fn set_method(&mut self, method: HttpMethod) {
        if self.current.method == method {
            return;
        }
        self.current.method = method;
        self.committer.submit(self.current.clone());
    }

    /// Returns true if a commit is still settling.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.committer.is_pending()
    }

    /// Waits for the pending commit, if any.
    pub async fn settle(&mut self) {
        self.committer.settle().await;
    }
}
