//! # Function-backed executor (`ExecuteFn`)
//!
//! [`ExecuteFn`] wraps a closure `F: Fn(Task, CancellationToken) -> Fut`, producing a
//! fresh future per attempt. There is no hidden mutation between attempts; if the
//! closure needs shared state, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use retrypool::{AttemptError, ExecuteFn, ExecuteRef, Task};
//!
//! let exec: ExecuteRef = ExecuteFn::arc("echo", |task: Task, _ctx: CancellationToken| async move {
//!     if task.payload().is_empty() {
//!         return Err(AttemptError::fail("empty payload"));
//!     }
//!     Ok(())
//! });
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AttemptError;
use crate::tasks::{execute::Execute, task::Task};

/// Function-backed executor.
#[derive(Debug)]
pub struct ExecuteFn<F> {
    label: Cow<'static, str>,
    f: F,
}

impl<F> ExecuteFn<F> {
    /// Creates a new function-backed executor.
    ///
    /// Prefer [`ExecuteFn::arc`] when you immediately need an [`ExecuteRef`](crate::ExecuteRef).
    pub fn new(label: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }

    /// Creates the executor and returns it as a shared handle.
    pub fn arc(label: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(label, f))
    }

    /// Returns the label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl<F, Fut> Execute for ExecuteFn<F>
where
    F: Fn(Task, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), AttemptError>> + Send + 'static,
{
    async fn execute(&self, task: &Task, ctx: CancellationToken) -> Result<(), AttemptError> {
        (self.f)(task.clone(), ctx).await
    }

    fn name(&self) -> &'static str {
        "ExecuteFn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_verdict_is_forwarded() {
        let exec = ExecuteFn::arc("even-only", |task: Task, _ctx: CancellationToken| async move {
            if task.id() % 2 == 0 {
                Ok(())
            } else {
                Err(AttemptError::fail("odd"))
            }
        });

        assert_eq!(exec.label(), "even-only");
        let token = CancellationToken::new();
        assert!(exec.execute(&Task::new(2, "a"), token.clone()).await.is_ok());
        assert_eq!(
            exec.execute(&Task::new(3, "b"), token).await,
            Err(AttemptError::fail("odd"))
        );
    }
}
