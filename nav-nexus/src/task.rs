//! Background task tracking for the router's listeners.
//!
//! The bootstrapper spawns a handful of long-lived or delayed tasks (the
//! fragment listener, the deferred first navigation, the startup check).
//! `TaskTracker` keeps their abort handles so they can be cancelled together.

use std::future::Future;
use tokio::task::AbortHandle;

/// A handle to a spawned task that can be aborted.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    abort_handle: AbortHandle,
}

impl TaskHandle {
    pub fn new(name: &'static str, abort_handle: AbortHandle) -> Self {
        Self { name, abort_handle }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Abort the task. It is cancelled at its next await point.
    pub fn abort(&self) {
        self.abort_handle.abort();
    }

    /// Whether the task has finished, either by completing or by being aborted.
    pub fn is_finished(&self) -> bool {
        self.abort_handle.is_finished()
    }
}

/// A set of named tasks cancelled together, at the latest on drop.
#[derive(Debug, Default)]
pub struct TaskTracker {
    handles: Vec<TaskHandle>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self { handles: Vec::new() }
    }

    /// Spawn `future` on the current runtime and track it.
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        self.track(TaskHandle::new(name, handle.abort_handle()));
    }

    pub fn track(&mut self, handle: TaskHandle) {
        // Drop finished tasks while adding new ones
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    pub fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            if !handle.is_finished() {
                tracing::debug!(task = handle.name(), "aborting router task");
            }
            handle.abort();
        }
    }

    /// Names of the tasks still running.
    pub fn active(&self) -> Vec<&'static str> {
        self.handles
            .iter()
            .filter(|h| !h.is_finished())
            .map(TaskHandle::name)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for TaskTracker {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_abort_all() {
        let mut tracker = TaskTracker::new();
        tracker.spawn("forever", async {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });
        tracker.spawn("short", async {});
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(tracker.active(), vec!["forever"]);

        tracker.abort_all();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(tracker.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts() {
        let mut tracker = TaskTracker::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tracker.spawn("waiter", async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = tx.send(());
        });

        drop(tracker);
        assert!(rx.await.is_err());
    }
}
