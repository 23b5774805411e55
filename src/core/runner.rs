//! # Run a single attempt of a task.
//!
//! Executes one attempt through the pool's [`Execute`] implementation with an optional
//! timeout and publishes the attempt's terminal event to the [`Bus`].
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   exec.execute() → Ok(())  → publish TaskCompleted
//!
//! Failure:
//!   exec.execute() → Err(e)  → publish TaskFailed
//!
//! Panic:
//!   exec.execute() panics    → publish TaskFailed (Panicked)
//!
//! Timeout:
//!   timeout exceeded → cancel child → publish TimeoutHit
//!                                   → publish TaskFailed (Timeout)
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event: `TaskCompleted` or `TaskFailed`
//! - The verdict is evaluated **once** per attempt
//! - Derives a fresh cancellation token per attempt

use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{AttemptError, panic_message},
    events::{Bus, Event, EventKind},
    tasks::{Execute, Task, WorkerId},
};

/// Executes a single attempt of `task` on `worker`, publishing lifecycle events to `bus`.
///
/// ### Timeout behavior
/// If `timeout` is `Some(dur)` and `dur > 0`, execution is wrapped in
/// `tokio::time::timeout`; on expiry the attempt token is cancelled, `TimeoutHit`
/// is published and the attempt fails with [`AttemptError::Timeout`].
pub async fn run_once(
    exec: &dyn Execute,
    task: &Task,
    worker: WorkerId,
    attempt: u32,
    timeout: Option<Duration>,
    bus: &Bus,
) -> Result<(), AttemptError> {
    let token = CancellationToken::new();
    let body = std::panic::AssertUnwindSafe(exec.execute(task, token.clone()))
        .catch_unwind()
        .map(|r| {
            r.unwrap_or_else(|payload| {
                Err(AttemptError::Panicked {
                    info: panic_message(&*payload),
                })
            })
        });

    let res = match timeout.filter(|d| *d > Duration::ZERO) {
        Some(dur) => match time::timeout(dur, body).await {
            Ok(r) => r,
            Err(_elapsed) => {
                token.cancel();
                bus.publish(
                    Event::new(EventKind::TimeoutHit)
                        .with_task(task.id())
                        .with_worker(worker)
                        .with_attempt(attempt)
                        .with_timeout(dur),
                );
                Err(AttemptError::Timeout { timeout: dur })
            }
        },
        None => body.await,
    };

    match &res {
        Ok(()) => bus.publish(
            Event::new(EventKind::TaskCompleted)
                .with_task(task.id())
                .with_worker(worker)
                .with_attempt(attempt),
        ),
        Err(e) => bus.publish(
            Event::new(EventKind::TaskFailed)
                .with_task(task.id())
                .with_worker(worker)
                .with_attempt(attempt)
                .with_reason(e.to_string()),
        ),
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::ExecuteFn;

    async fn kinds_after(
        bus: &Bus,
        run: impl std::future::Future<Output = Result<(), AttemptError>>,
    ) -> (Result<(), AttemptError>, Vec<EventKind>) {
        let mut rx = bus.subscribe();
        let res = run.await;
        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        (res, kinds)
    }

    #[tokio::test]
    async fn success_publishes_completed() {
        let bus = Bus::new(16);
        let exec = ExecuteFn::new("ok", |_t: Task, _c: CancellationToken| async {
            Ok::<(), AttemptError>(())
        });
        let task = Task::new(1, "a");

        let (res, kinds) = kinds_after(&bus, run_once(&exec, &task, 1, 1, None, &bus)).await;
        assert!(res.is_ok());
        assert_eq!(kinds, vec![EventKind::TaskCompleted]);
    }

    #[tokio::test]
    async fn panic_becomes_failure() {
        let bus = Bus::new(16);
        let exec = ExecuteFn::new("boom", |t: Task, _c: CancellationToken| async move {
            if t.id() == 2 {
                panic!("exploded");
            }
            Ok::<(), AttemptError>(())
        });
        let task = Task::new(2, "b");

        let (res, kinds) = kinds_after(&bus, run_once(&exec, &task, 1, 1, None, &bus)).await;
        assert_eq!(
            res,
            Err(AttemptError::Panicked {
                info: "exploded".into()
            })
        );
        assert_eq!(kinds, vec![EventKind::TaskFailed]);
    }

    #[tokio::test]
    async fn timeout_cancels_and_fails() {
        let bus = Bus::new(16);
        let exec = ExecuteFn::new("slow", |_t: Task, ctx: CancellationToken| async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(30)) => Ok(()),
                _ = ctx.cancelled() => Err(AttemptError::fail("cancelled")),
            }
        });
        let task = Task::new(3, "c");
        let limit = Duration::from_millis(20);

        let (res, kinds) =
            kinds_after(&bus, run_once(&exec, &task, 2, 1, Some(limit), &bus)).await;
        assert_eq!(res, Err(AttemptError::Timeout { timeout: limit }));
        assert_eq!(kinds, vec![EventKind::TimeoutHit, EventKind::TaskFailed]);
    }
}
