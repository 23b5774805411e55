//! # Pool: seeds the batch, wires workers and recovery, and gates shutdown.
//!
//! The [`Pool`] owns the configuration, the executor and the subscribers. Each call to
//! [`Pool::run`] builds a fresh runtime graph for one batch and tears it down once
//! every task is terminal.
//!
//! ## High-level architecture
//! ```text
//! Pool::run(batch)
//!   ├─► validate (empty batch / zero workers / duplicate ids)
//!   ├─► ledger = RetryLedger{ id → 0 }
//!   ├─► fan-out listener: Bus ─► SubscriberSet
//!   ├─► spawn RecoveryLoop(ledger)            (listening before any worker starts)
//!   ├─► spawn Worker 1..=W
//!   ├─► queue.push(task, attempt 1) for each task
//!   │
//!   │     Worker ──ok──► conclusions ◄──exhausted── RecoveryLoop
//!   │        └──failure──► failures ──────────────────┘   │
//!   │                                                     └─► queue.push (retry)
//!   │
//!   ├─► count conclusions until == batch size     (join count)
//!   ├─► queue.close() ─► workers.join()
//!   ├─► close failures ─► recovery.await ─► ledger
//!   └─► publish AllConcluded ─► flush subscribers ─► Report
//! ```
//!
//! ## Rules
//! - The work queue is closed only after the join count reaches the batch size, so a
//!   re-enqueue can never race the close
//! - The failure queue is closed only after every worker instance has exited
//! - Precondition violations are rejected before anything is spawned

use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::{sync::broadcast, sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        builder::PoolBuilder,
        config::PoolConfig,
        ledger::RetryLedger,
        queue::{WorkItem, WorkQueue},
        recovery::RecoveryLoop,
        report::Report,
        worker::WorkerPool,
    },
    error::PoolError,
    events::{Bus, Event, EventKind},
    policies::RoundRobin,
    subscribers::{Subscribe, SubscriberSet},
    tasks::{ExecuteRef, Task},
};

/// Bounded worker pool with failure redistribution.
///
/// # Example
/// ```rust
/// use retrypool::{Pool, PoolConfig, SimulatedWork, Task};
/// use std::sync::Arc;
///
/// #[tokio::main(flavor = "multi_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = Pool::builder(PoolConfig::new(3, 3), Arc::new(SimulatedWork::new(0.0))).build();
///
///     let batch = (1..=5).map(|id| Task::new(id, format!("Task {id}"))).collect();
///     let report = pool.run(batch).await?;
///
///     assert_eq!(report.succeeded(), vec![1, 2, 3, 4, 5]);
///     Ok(())
/// }
/// ```
pub struct Pool {
    cfg: PoolConfig,
    exec: ExecuteRef,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Pool {
    /// Creates a pool with the given config, executor and subscribers.
    pub fn new(cfg: PoolConfig, exec: ExecuteRef, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self {
            cfg,
            exec,
            subscribers,
        }
    }

    /// Starts building a pool.
    pub fn builder(cfg: PoolConfig, exec: ExecuteRef) -> PoolBuilder {
        PoolBuilder::new(cfg, exec)
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.cfg
    }

    /// Runs `batch` to completion.
    ///
    /// Returns once every task has either succeeded or exhausted its retries, all
    /// worker instances have exited and every subscriber has received the
    /// notifications published during the run.
    pub async fn run(&self, batch: Vec<Task>) -> Result<Report, PoolError> {
        let slots = self.validate(&batch)?;
        let size = batch.len();
        tracing::debug!(tasks = size, workers = slots.get(), "pool starting");

        let ledger = RetryLedger::new(batch.iter().map(Task::id));
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = self.subscriber_listener(&bus);

        let queue = WorkQueue::new(size);
        let (failures_tx, failures_rx) = mpsc::channel(size);
        let (conclusions_tx, mut conclusions_rx) = mpsc::channel(size);
        let workers = WorkerPool::new(
            Arc::clone(&self.exec),
            queue.clone(),
            failures_tx,
            conclusions_tx.clone(),
            bus.clone(),
            self.cfg.attempt_timeout(),
        );

        let failures_closed = CancellationToken::new();
        let recovery = RecoveryLoop::new(
            ledger,
            self.cfg.retry_policy(),
            RoundRobin::new(slots),
            workers.clone(),
            queue.clone(),
            conclusions_tx,
            bus.clone(),
        );
        let recovery = tokio::spawn(recovery.run(failures_rx, failures_closed.clone()));

        for slot in 1..=slots.get() {
            workers.spawn(slot);
        }
        for task in batch {
            queue
                .push(WorkItem::first(task))
                .await
                .map_err(|_| PoolError::Stalled {
                    concluded: 0,
                    expected: size,
                })?;
        }

        let mut outcomes = BTreeMap::new();
        while outcomes.len() < size {
            match conclusions_rx.recv().await {
                Some(c) => {
                    outcomes.insert(c.task, c.outcome);
                }
                None => {
                    return Err(PoolError::Stalled {
                        concluded: outcomes.len(),
                        expected: size,
                    });
                }
            }
        }

        queue.close();
        workers.join().await;
        tracing::trace!(live = workers.live(), "workers joined");
        failures_closed.cancel();
        let ledger = recovery.await.map_err(|_| PoolError::RecoveryPanicked)?;

        bus.publish(Event::new(EventKind::AllConcluded));
        if listener.await.is_err() {
            tracing::warn!("subscriber listener panicked");
        }

        let report = Report::new(outcomes, ledger.into_inner());
        tracing::debug!(
            succeeded = report.succeeded().len(),
            exhausted = report.exhausted().len(),
            "pool finished"
        );
        Ok(report)
    }

    /// Rejects malformed input before anything is spawned.
    fn validate(&self, batch: &[Task]) -> Result<NonZeroUsize, PoolError> {
        if batch.is_empty() {
            return Err(PoolError::EmptyBatch);
        }
        let slots = self.cfg.worker_slots().ok_or(PoolError::ZeroWorkers)?;

        let mut seen = HashSet::with_capacity(batch.len());
        for task in batch {
            if !seen.insert(task.id()) {
                return Err(PoolError::DuplicateTaskId { id: task.id() });
            }
        }
        Ok(slots)
    }

    /// Forwards bus events to the subscriber set until `AllConcluded`, then drains it.
    ///
    /// The receiver is created before returning, so no event published afterwards is missed.
    fn subscriber_listener(&self, bus: &Bus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), bus.clone());

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        set.emit(&ev);
                        if ev.kind == EventKind::AllConcluded {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event listener lagged; notifications lost");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::SimulatedWork;

    fn pool(workers: usize) -> Pool {
        Pool::new(
            PoolConfig::new(workers, 1),
            Arc::new(SimulatedWork::new(0.0)),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn rejects_empty_batch() {
        assert_eq!(pool(2).run(Vec::new()).await.unwrap_err(), PoolError::EmptyBatch);
    }

    #[tokio::test]
    async fn rejects_zero_workers() {
        let err = pool(0).run(vec![Task::new(1, "a")]).await.unwrap_err();
        assert_eq!(err, PoolError::ZeroWorkers);
        assert!(err.is_precondition());
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let batch = vec![Task::new(1, "a"), Task::new(2, "b"), Task::new(1, "c")];
        assert_eq!(
            pool(1).run(batch).await.unwrap_err(),
            PoolError::DuplicateTaskId { id: 1 }
        );
    }

    #[tokio::test]
    async fn single_worker_runs_whole_batch() {
        let batch = (1..=4).map(|id| Task::new(id, "x")).collect();
        let report = pool(1).run(batch).await.unwrap();
        assert_eq!(report.succeeded(), vec![1, 2, 3, 4]);
        assert_eq!(report.total_attempts(), 4);
    }
}
