//! # Execution seam.
//!
//! [`Execute`] is the pluggable source of per-attempt verdicts. The pool calls it
//! once per attempt and maps `Ok(())` to success and `Err(_)` to failure; what
//! happens inside (real work, a simulated sleep, a scripted verdict) is up to
//! the implementor.
//!
//! The common handle type is [`ExecuteRef`], an `Arc<dyn Execute>` shared by all
//! workers, including replacements.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AttemptError;
use crate::tasks::task::Task;

/// Shared handle to an executor.
pub type ExecuteRef = Arc<dyn Execute>;

/// # Runs one attempt of a task.
///
/// The token passed to [`execute`](Execute::execute) is cancelled when the
/// attempt exceeds the pool's per-attempt timeout; long-running bodies should
/// check it and return early.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use retrypool::{AttemptError, Execute, Task};
///
/// struct RejectOdd;
///
/// #[async_trait]
/// impl Execute for RejectOdd {
///     async fn execute(&self, task: &Task, _ctx: CancellationToken) -> Result<(), AttemptError> {
///         if task.id() % 2 == 1 {
///             return Err(AttemptError::fail("odd id"));
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Execute: Send + Sync + 'static {
    /// Executes one attempt of `task`.
    async fn execute(&self, task: &Task, ctx: CancellationToken) -> Result<(), AttemptError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
