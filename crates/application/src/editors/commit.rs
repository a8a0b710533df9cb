//! Debounced, de-duplicated commits of editor state.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::debounce::Debouncer;

/// Future returned by a commit callback; resolves to whether the commit
/// was accepted.
pub type CommitFuture = Pin<Box<dyn Future<Output = bool> + Send>>;

/// Callback that persists a settled editor value.
pub type CommitFn<T> = Arc<dyn Fn(T) -> CommitFuture + Send + Sync>;

/// Commits the latest settled value once edits stop for the settle time.
///
/// A value equal to the last accepted commit is never sent again, so a
/// no-op edit (toggling a row off and on again) produces no write. A
/// rejected commit leaves the last accepted value in place so the same
/// content is retried on the next edit.
///
/// Commits run one at a time in submission order. A commit that settles
/// while an earlier one is still in flight waits for it, then compares
/// against whatever that one left as the last accepted value.
pub struct DebouncedCommit<T> {
    debouncer: Debouncer,
    last_committed: Arc<Mutex<T>>,
    in_flight: Arc<AsyncMutex<()>>,
    commit: CommitFn<T>,
}

impl<T> DebouncedCommit<T>
where
    T: Clone + PartialEq + Debug + Send + Sync + 'static,
{
    /// Creates a committer whose baseline is the already persisted value.
    pub fn new(committed: T, delay: Duration, commit: CommitFn<T>) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            last_committed: Arc::new(Mutex::new(committed)),
            in_flight: Arc::new(AsyncMutex::new(())),
            commit,
        }
    }

    /// Submits the current value; supersedes any value still settling.
    pub fn submit(&mut self, value: T) {
        let last_committed = Arc::clone(&self.last_committed);
        let in_flight = Arc::clone(&self.in_flight);
        let commit = Arc::clone(&self.commit);
        self.debouncer.schedule(async move {
            let _turn = in_flight.lock().await;
            if *last_committed.lock() == value {
                debug!("settled value matches last commit, skipping");
                return;
            }
            if commit(value.clone()).await {
                *last_committed.lock() = value;
            }
        });
    }

    /// Returns the last accepted value.
    #[must_use]
    pub fn last_committed(&self) -> T {
        self.last_committed.lock().clone()
    }

    /// Returns true if a value is waiting for its settle time.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Waits for the most recent submission to be committed or skipped.
    pub async fn settle(&mut self) {
        self.debouncer.settle().await;
    }
}
