//! Background task bookkeeping for the store.
//!
//! Commands that talk to the network run as detached tokio tasks. `Tasks`
//! tracks them so owners (the CLI, tests) can wait for every dispatched task
//! to finish before reading the final state. Tasks are never cancelled.

use std::future::Future;

use log::error;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

/// Shared handle used to spawn tracked background tasks.
///
/// Clones share the same tracker, so a task spawned through any clone is
/// visible to [`Tasks::wait_idle`] on every other clone.
#[derive(Debug, Clone)]
pub struct Tasks {
    tracker: TaskTracker,
}

impl Default for Tasks {
    fn default() -> Self {
        Self::new()
    }
}

impl Tasks {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
        }
    }

    /// Spawn `task` on the current tokio runtime.
    ///
    /// Returns `false` (and logs) instead of panicking when called outside a
    /// runtime, so fire-and-forget callers never fail synchronously.
    pub fn spawn<F>(&self, label: &str, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(handle) => {
                self.tracker.spawn_on(task, &handle);
                true
            }
            Err(err) => {
                error!("Cannot spawn `{label}`, no async runtime: {err}");
                false
            }
        }
    }

    /// Number of tasks still running.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Wait until every task spawned so far has finished.
    ///
    /// Tasks spawned while waiting are waited for as well. The tracker accepts
    /// new tasks again once this returns.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_wait_idle_waits_for_all_spawned_tasks() {
        let tasks = Tasks::new();
        let done = Arc::new(AtomicUsize::new(0));

        for delay in [5_u64, 10, 1] {
            let done = Arc::clone(&done);
            assert!(tasks.spawn("sleep", async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                done.fetch_add(1, Ordering::SeqCst);
            }));
        }

        tasks.wait_idle().await;

        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_tracker_reopens_after_wait() {
        let tasks = Tasks::new();
        tasks.wait_idle().await;

        let clone = tasks.clone();
        assert!(clone.spawn("noop", async {}));
        tasks.wait_idle().await;
        assert_eq!(tasks.len(), 0);
    }

    #[test]
    fn test_spawn_outside_runtime_does_not_panic() {
        let tasks = Tasks::new();
        assert!(!tasks.spawn("orphan", async {}));
        assert!(tasks.is_empty());
    }
}
