//! Tracks the single gallery call allowed in flight.

use std::sync::mpsc;
use std::sync::Arc;

use super::{SyncOp, SyncTask, SyncUpdate, TaskCompletion, TaskId};
use crate::error::GalleryError;
use crate::gallery::{GalleryApi, Snapshot};

/// Runs gallery calls on worker threads, one at a time.
pub struct SyncTaskManager {
    current: Option<SyncTask>,
}

impl SyncTaskManager {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Start `call` on a worker thread. Refuses (returns `None`) while another
    /// call is still in flight.
    pub fn start<F>(&mut self, op: SyncOp, api: Arc<dyn GalleryApi>, call: F) -> Option<TaskId>
    where
        F: FnOnce(&dyn GalleryApi) -> Result<Snapshot, GalleryError> + Send + 'static,
    {
        if let Some(task) = &self.current {
            tracing::warn!(running = ?task.op, requested = ?op, "gallery call refused, another one is in flight");
            return None;
        }

        let (tx, rx) = mpsc::channel();
        let task = SyncTask::new(op, rx);
        let id = task.id;
        self.current = Some(task);

        std::thread::spawn(move || {
            let update = match call(api.as_ref()) {
                Ok(snapshot) => SyncUpdate::Succeeded(snapshot),
                Err(e) => SyncUpdate::Failed(e),
            };
            let _ = tx.send(update);
            let _ = tx.send(SyncUpdate::Completed);
        });

        tracing::debug!(?op, id = id.0, "gallery call started");
        Some(id)
    }

    /// Drain available updates without blocking. Returns the completion once
    /// the running task has sent `Completed`.
    pub fn poll_updates(&mut self) -> Option<TaskCompletion> {
        let task = self.current.as_mut()?;
        loop {
            match task.receiver.try_recv() {
                Ok(SyncUpdate::Completed) => return self.finish(),
                Ok(update) => record(task, update),
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => return self.finish(),
            }
        }
    }

    /// Block until the running task completes. `None` if nothing is running.
    pub fn wait(&mut self) -> Option<TaskCompletion> {
        let task = self.current.as_mut()?;
        loop {
            match task.receiver.recv() {
                Ok(SyncUpdate::Completed) | Err(_) => return self.finish(),
                Ok(update) => record(task, update),
            }
        }
    }

    fn finish(&mut self) -> Option<TaskCompletion> {
        let task = self.current.take()?;
        let elapsed = task.elapsed();
        let result = task.outcome.unwrap_or_else(|| {
            Err(GalleryError::Transport {
                method: task.op.method(),
                url: String::new(),
                message: "worker exited without an answer".to_string(),
            })
        });
        tracing::debug!(op = ?task.op, id = task.id.0, ?elapsed, "gallery call completed");
        Some(TaskCompletion {
            id: task.id,
            op: task.op,
            result,
        })
    }
}

fn record(task: &mut SyncTask, update: SyncUpdate) {
    match update {
        SyncUpdate::Succeeded(snapshot) => task.outcome = Some(Ok(snapshot)),
        SyncUpdate::Failed(error) => task.outcome = Some(Err(error)),
        SyncUpdate::Completed => {}
    }
}

impl Default for SyncTaskManager {
    fn default() -> Self {
        Self::new()
    }
}
