//! Cancellable debounce timer.
//!
//! Each [`Debouncer::schedule`] supersedes the previously scheduled task if
//! its settle time has not elapsed yet. Once a task has started it runs to
//! completion; only the waiting phase can be cancelled.

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct PendingTimer {
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// A single-slot timer that runs the most recently scheduled task after a
/// settle time.
///
/// Dropping the debouncer cancels a task that is still waiting.
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingTimer>,
}

impl Debouncer {
    /// Creates a debouncer with the given settle time.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules `task` to run once the settle time passes without another
    /// call to `schedule` or `cancel`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let (cancel, cancelled) = oneshot::channel::<()>();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => task.await,
                _ = cancelled => {}
            }
        });
        self.pending = Some(PendingTimer { cancel, handle });
    }

    /// Cancels the waiting task, if any.
    ///
    /// Returns true if a task was still waiting and will now never run.
    pub fn cancel(&mut self) -> bool {
        self.pending
            .take()
            .is_some_and(|timer| timer.cancel.send(()).is_ok())
    }

    /// Returns true if a task is waiting for its settle time.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|timer| !timer.cancel.is_closed())
    }

    /// Waits for the most recently scheduled task to finish.
    ///
    /// Returns immediately if nothing was scheduled.
    pub async fn settle(&mut self) {
        if let Some(timer) = self.pending.take() {
            let PendingTimer { cancel, handle } = timer;
            let _ = handle.await;
            drop(cancel);
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
