use std::time::Duration;

use tokio::{task::JoinHandle, time::sleep};

/// A delayed action that never runs once cancelled or dropped.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Runs `action` on the runtime after `delay`.
    pub fn after<F>(delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            action();
        });
        Self { handle }
    }

    /// Aborts the task. A no-op once the action already ran.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
