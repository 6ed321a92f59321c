//! Background execution of gallery calls.
//!
//! Each remote call runs on its own worker thread and reports back over a
//! channel: first `Succeeded` or `Failed`, then `Completed`. The event loop
//! drains the channel without blocking.

pub mod manager;

use std::sync::mpsc;
use std::time::Instant;

pub use manager::SyncTaskManager;

use crate::error::GalleryError;
use crate::gallery::Snapshot;

/// Unique identifier for a sync task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        TaskId(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which gallery operation a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    List,
    Create,
    Update,
    Delete,
}

impl SyncOp {
    /// HTTP method used by the operation.
    pub fn method(&self) -> &'static str {
        match self {
            SyncOp::List => "GET",
            SyncOp::Create => "POST",
            SyncOp::Update => "PUT",
            SyncOp::Delete => "DELETE",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, SyncOp::List)
    }

    /// Full display name for the status bar.
    pub fn display_name(&self) -> &'static str {
        match self {
            SyncOp::List => "Loading gallery",
            SyncOp::Create => "Adding picture",
            SyncOp::Update => "Saving picture",
            SyncOp::Delete => "Deleting picture",
        }
    }
}

/// Messages sent from a worker thread.
#[derive(Debug)]
pub enum SyncUpdate {
    /// The server answered with a snapshot.
    Succeeded(Snapshot),
    /// The call failed before or at the server.
    Failed(GalleryError),
    /// Sent last, after either outcome.
    Completed,
}

/// A call in flight.
pub struct SyncTask {
    pub id: TaskId,
    pub op: SyncOp,
    pub receiver: mpsc::Receiver<SyncUpdate>,
    pub outcome: Option<Result<Snapshot, GalleryError>>,
    pub started_at: Instant,
}

impl SyncTask {
    pub fn new(op: SyncOp, receiver: mpsc::Receiver<SyncUpdate>) -> Self {
        Self {
            id: TaskId::new(),
            op,
            receiver,
            outcome: None,
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

/// A finished call, ready to be applied to the gallery state.
#[derive(Debug)]
pub struct TaskCompletion {
    pub id: TaskId,
    pub op: SyncOp,
    pub result: Result<Snapshot, GalleryError>,
}
