//! # Workers: one-shot-on-failure executors.
//!
//! A [`Worker`] pulls [`WorkItem`]s from the shared [`WorkQueue`] and runs one attempt
//! per item. Success concludes the task and the worker loops; failure is reported to
//! the recovery loop and **retires** the worker instance. Retired slots are refilled by
//! the recovery loop spawning a replacement through [`WorkerPool::spawn`].
//!
//! ## Flow
//! ```text
//! loop {
//!   ├─► queue.next() ── None (closed & empty) ─► exit Drained
//!   ├─► publish TaskStarting{ task, worker, attempt }
//!   ├─► run_once(exec, task, timeout)
//!   │       ├─ Ok  ─► conclusions.send(Succeeded) ─► continue
//!   │       └─ Err ─► publish WorkerRetired
//!   │                 ├─► failures.send(Attempt::failed) (awaits when full)
//!   │                 └─► exit Retired
//! }
//! ```
//!
//! ## Rules
//! - Items are processed strictly in pull order within one worker
//! - Exactly one failure message per failed attempt
//! - A worker never pulls again after a failure

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::{
    core::{
        queue::{WorkItem, WorkQueue},
        report::{Conclusion, TaskOutcome},
        runner::run_once,
    },
    events::{Bus, Event, EventKind},
    tasks::{Attempt, ExecuteRef, WorkerId},
};

/// Why a worker instance stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The queue was closed and empty.
    Drained,
    /// An attempt failed; the instance retired.
    Retired,
    /// The pool stopped listening (receiver side dropped).
    Abandoned,
}

/// Shared wiring for every worker instance, including replacements.
///
/// Cheap to clone; the recovery loop keeps one to spawn replacements.
#[derive(Clone)]
pub struct WorkerPool {
    exec: ExecuteRef,
    queue: WorkQueue,
    failures: mpsc::Sender<Attempt>,
    conclusions: mpsc::Sender<Conclusion>,
    bus: Bus,
    timeout: Option<Duration>,
    tracker: TaskTracker,
}

impl WorkerPool {
    pub fn new(
        exec: ExecuteRef,
        queue: WorkQueue,
        failures: mpsc::Sender<Attempt>,
        conclusions: mpsc::Sender<Conclusion>,
        bus: Bus,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            exec,
            queue,
            failures,
            conclusions,
            bus,
            timeout,
            tracker: TaskTracker::new(),
        }
    }

    /// Spawns a worker instance bound to `slot`.
    pub fn spawn(&self, slot: WorkerId) {
        let worker = Worker {
            slot,
            pool: self.clone(),
        };
        self.tracker.spawn(worker.run());
    }

    /// Closes the tracker and waits for every spawned instance to exit.
    ///
    /// Instances spawned after this call are still awaited.
    pub async fn join(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Number of worker instances currently alive.
    pub fn live(&self) -> usize {
        self.tracker.len()
    }
}

/// One executor instance bound to a worker slot.
pub struct Worker {
    slot: WorkerId,
    pool: WorkerPool,
}

impl Worker {
    /// Runs the pull loop until the queue drains or an attempt fails.
    pub async fn run(self) -> WorkerExit {
        let pool = &self.pool;

        while let Some(WorkItem { task, attempt }) = pool.queue.next().await {
            pool.bus.publish(
                Event::new(EventKind::TaskStarting)
                    .with_task(task.id())
                    .with_worker(self.slot)
                    .with_attempt(attempt),
            );

            match run_once(
                pool.exec.as_ref(),
                &task,
                self.slot,
                attempt,
                pool.timeout,
                &pool.bus,
            )
            .await
            {
                Ok(()) => {
                    let done = Conclusion {
                        task: task.id(),
                        outcome: TaskOutcome::Succeeded { attempts: attempt },
                    };
                    if pool.conclusions.send(done).await.is_err() {
                        return WorkerExit::Abandoned;
                    }
                }
                Err(e) => {
                    pool.bus.publish(
                        Event::new(EventKind::WorkerRetired)
                            .with_worker(self.slot)
                            .with_task(task.id()),
                    );
                    let report = Attempt::failed(task, self.slot, attempt, e.to_string());
                    if pool.failures.send(report).await.is_err() {
                        return WorkerExit::Abandoned;
                    }
                    return WorkerExit::Retired;
                }
            }
        }
        WorkerExit::Drained
    }
}
