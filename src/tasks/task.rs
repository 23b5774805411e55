//! # Batch items and attempt records.
//!
//! A [`Task`] is an immutable unit of work submitted once at startup. It moves
//! between the work queue and workers by value (cloning is cheap: the payload is
//! shared behind an `Arc<str>`).
//!
//! An [`Attempt`] is the ephemeral record a worker produces for one try of one task.

use std::fmt;
use std::sync::Arc;

/// Identifier of a task, unique within a batch.
pub type TaskId = u64;

/// Identifier of a worker slot (`1..=workers`).
pub type WorkerId = usize;

/// Immutable unit of work.
///
/// # Example
/// ```
/// use retrypool::Task;
///
/// let t = Task::new(1, "resize image");
/// assert_eq!(t.id(), 1);
/// assert_eq!(t.payload(), "resize image");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Task {
    id: TaskId,
    payload: Arc<str>,
}

impl Task {
    /// Creates a new task.
    pub fn new(id: TaskId, payload: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// Returns the task id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the opaque payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("payload", &&*self.payload)
            .finish()
    }
}

/// Verdict of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// One execution try of one task by one worker instance.
///
/// Workers only publish failed attempts to the failure queue; the recovery loop
/// consumes each one exactly once.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// The task that was tried.
    pub task: Task,
    /// Slot of the worker that ran the attempt.
    pub worker: WorkerId,
    /// Attempt number for this task (1-based).
    pub attempt: u32,
    /// Verdict.
    pub outcome: Outcome,
    /// Failure description, if any.
    pub reason: Option<Arc<str>>,
}

impl Attempt {
    /// Builds a failed attempt record.
    pub fn failed(task: Task, worker: WorkerId, attempt: u32, reason: impl Into<Arc<str>>) -> Self {
        Self {
            task,
            worker,
            attempt,
            outcome: Outcome::Failure,
            reason: Some(reason.into()),
        }
    }

    /// Convenience: the id of the tried task.
    pub fn task_id(&self) -> TaskId {
        self.task.id()
    }
}
