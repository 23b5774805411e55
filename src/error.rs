//! Error types used by the pool and by individual attempts.
//!
//! This module defines two main error enums:
//!
//! - [`PoolError`] — errors raised by the pool itself (rejected input, broken wiring).
//! - [`AttemptError`] — errors raised by a single execution attempt of a task.
//!
//! Attempt errors never escape [`Pool::run`](crate::Pool::run): the worker turns them
//! into a failure [`Attempt`](crate::Attempt) and the recovery loop decides what happens next.

use std::any::Any;
use std::time::Duration;
use thiserror::Error;

use crate::tasks::TaskId;

/// # Errors produced by the pool.
///
/// Precondition violations are reported synchronously by [`Pool::run`](crate::Pool::run)
/// before any worker is spawned. The remaining variants indicate a broken runtime
/// and should not occur in practice.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The submitted batch contains no tasks.
    #[error("batch is empty")]
    EmptyBatch,

    /// The pool was configured with zero workers.
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// Two tasks in the batch share the same id.
    #[error("duplicate task id {id} in batch")]
    DuplicateTaskId {
        /// The repeated id.
        id: TaskId,
    },

    /// Every producer of terminal events went away before all tasks concluded.
    #[error("pool stalled: {concluded} of {expected} tasks concluded")]
    Stalled {
        /// Number of tasks that reached a terminal state.
        concluded: usize,
        /// Batch size.
        expected: usize,
    },

    /// The recovery loop task panicked.
    #[error("recovery loop panicked")]
    RecoveryPanicked,
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retrypool::PoolError;
    ///
    /// assert_eq!(PoolError::ZeroWorkers.as_label(), "pool_zero_workers");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::EmptyBatch => "pool_empty_batch",
            PoolError::ZeroWorkers => "pool_zero_workers",
            PoolError::DuplicateTaskId { .. } => "pool_duplicate_task_id",
            PoolError::Stalled { .. } => "pool_stalled",
            PoolError::RecoveryPanicked => "pool_recovery_panicked",
        }
    }

    /// True for errors caused by rejected input rather than the runtime.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PoolError::EmptyBatch | PoolError::ZeroWorkers | PoolError::DuplicateTaskId { .. }
        )
    }
}

/// # Errors produced by one execution attempt.
///
/// Every variant counts as a failed attempt and retires the worker that saw it.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// The task body reported a failure.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The attempt exceeded the configured per-attempt timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// The task body panicked.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl AttemptError {
    /// Shorthand for [`AttemptError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        AttemptError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retrypool::AttemptError;
    /// use std::time::Duration;
    ///
    /// let err = AttemptError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "attempt_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AttemptError::Fail { .. } => "attempt_failed",
            AttemptError::Timeout { .. } => "attempt_timeout",
            AttemptError::Panicked { .. } => "attempt_panicked",
        }
    }
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
