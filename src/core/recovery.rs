//! # Recovery loop: retry accounting and re-dispatch.
//!
//! The [`RecoveryLoop`] is the single consumer of the failure queue and the only
//! writer of the [`RetryLedger`]. It handles one failed [`Attempt`] at a time:
//!
//! ```text
//! Attempt(Failure) ──► ledger.record_failure(id) = n
//!     ├─ n > max_retries ─► publish TaskExhausted
//!     │                     ├─► spawn replacement on the retired worker's slot
//!     │                     └─► conclude Exhausted{ attempts: n }
//!     └─ otherwise        ─► slot = round_robin.next()
//!                           ├─► spawn replacement on slot
//!                           ├─► queue.push(task, attempt n + 1)
//!                           └─► publish TaskReassigned{ worker: slot, attempt: n }
//! ```
//!
//! ## Rules
//! - Messages are processed **sequentially**; the ledger needs no lock
//! - Every failure retires one worker and spawns exactly one replacement, so the
//!   number of live workers never drops below the slot count while work remains
//! - The round-robin advances on reassignment only
//! - The loop exits when the failure queue is closed and hands back the ledger

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        ledger::RetryLedger,
        queue::{WorkItem, WorkQueue},
        report::{Conclusion, TaskOutcome},
        worker::WorkerPool,
    },
    events::{Bus, Event, EventKind},
    policies::{RetryPolicy, RoundRobin},
    tasks::{Attempt, WorkerId},
};

/// What the loop did with one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Re-enqueued for another attempt; a replacement worker was spawned on `slot`.
    Reassigned { slot: WorkerId, retry: u32 },
    /// Dropped after `attempts` failed attempts.
    Exhausted { attempts: u32 },
}

/// Single-writer owner of the retry ledger.
pub struct RecoveryLoop {
    ledger: RetryLedger,
    policy: RetryPolicy,
    round_robin: RoundRobin,
    workers: WorkerPool,
    queue: WorkQueue,
    conclusions: mpsc::Sender<Conclusion>,
    bus: Bus,
}

impl RecoveryLoop {
    pub fn new(
        ledger: RetryLedger,
        policy: RetryPolicy,
        round_robin: RoundRobin,
        workers: WorkerPool,
        queue: WorkQueue,
        conclusions: mpsc::Sender<Conclusion>,
        bus: Bus,
    ) -> Self {
        Self {
            ledger,
            policy,
            round_robin,
            workers,
            queue,
            conclusions,
            bus,
        }
    }

    /// Consumes failures until `closed` is cancelled (or every sender is gone).
    ///
    /// Pending failures are handled before the close is honored.
    pub async fn run(
        mut self,
        mut failures: mpsc::Receiver<Attempt>,
        closed: CancellationToken,
    ) -> RetryLedger {
        loop {
            let attempt = tokio::select! {
                biased;
                msg = failures.recv() => match msg {
                    Some(attempt) => attempt,
                    None => break,
                },
                _ = closed.cancelled() => break,
            };
            self.handle(attempt).await;
        }
        self.ledger
    }

    /// Applies the retry policy to one failed attempt.
    pub async fn handle(&mut self, attempt: Attempt) -> Decision {
        let id = attempt.task_id();
        let failures = self.ledger.record_failure(id);

        if !self.policy.allows(failures) {
            self.bus.publish(
                Event::new(EventKind::TaskExhausted)
                    .with_task(id)
                    .with_attempt(failures),
            );
            self.spawn_replacement(attempt.worker);

            let done = Conclusion {
                task: id,
                outcome: TaskOutcome::Exhausted { attempts: failures },
            };
            if self.conclusions.send(done).await.is_err() {
                tracing::debug!(task = id, "pool stopped listening for conclusions");
            }
            return Decision::Exhausted {
                attempts: failures,
            };
        }

        let slot = self.round_robin.next_slot();
        self.spawn_replacement(slot);

        let item = WorkItem {
            task: attempt.task,
            attempt: failures + 1,
        };
        if let Err(item) = self.queue.push(item).await {
            tracing::warn!(task = item.task.id(), "work queue closed before re-enqueue");
        }
        self.bus.publish(
            Event::new(EventKind::TaskReassigned)
                .with_task(id)
                .with_worker(slot)
                .with_attempt(failures),
        );
        Decision::Reassigned {
            slot,
            retry: failures,
        }
    }

    #[cfg(test)]
    pub fn ledger(&self) -> &RetryLedger {
        &self.ledger
    }

    fn spawn_replacement(&self, slot: WorkerId) {
        self.workers.spawn(slot);
        self.bus
            .publish(Event::new(EventKind::WorkerSpawned).with_worker(slot));
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    use super::*;
    use crate::tasks::{SimulatedWork, Task};

    struct Harness {
        recovery: RecoveryLoop,
        queue: WorkQueue,
        conclusions: mpsc::Receiver<Conclusion>,
        workers: WorkerPool,
    }

    /// Wires a recovery loop whose replacement workers always succeed.
    fn harness(slots: usize, max_retries: u32) -> Harness {
        let bus = Bus::new(64);
        let queue = WorkQueue::new(16);
        let (failures_tx, _failures_rx) = mpsc::channel(16);
        let (conclusions_tx, conclusions) = mpsc::channel(16);
        let workers = WorkerPool::new(
            Arc::new(SimulatedWork::new(0.0)),
            queue.clone(),
            failures_tx,
            conclusions_tx.clone(),
            bus.clone(),
            None,
        );
        let recovery = RecoveryLoop::new(
            RetryLedger::new([1, 2]),
            RetryPolicy::new(max_retries),
            RoundRobin::new(NonZeroUsize::new(slots).unwrap()),
            workers.clone(),
            queue.clone(),
            conclusions_tx,
            bus,
        );
        Harness {
            recovery,
            queue,
            conclusions,
            workers,
        }
    }

    fn failed(id: u64, worker: WorkerId, attempt: u32) -> Attempt {
        Attempt::failed(Task::new(id, "p"), worker, attempt, "boom")
    }

    #[tokio::test]
    async fn zero_retries_exhausts_immediately() {
        let mut h = harness(1, 0);
        h.queue.close();

        let d = h.recovery.handle(failed(1, 1, 1)).await;
        assert_eq!(d, Decision::Exhausted { attempts: 1 });
        assert_eq!(h.recovery.ledger().failures(1), 1);

        let c = h.conclusions.recv().await.unwrap();
        assert_eq!(c.task, 1);
        assert_eq!(c.outcome, TaskOutcome::Exhausted { attempts: 1 });
        h.workers.join().await;
    }

    #[tokio::test]
    async fn reassignments_follow_round_robin_then_exhaust() {
        let mut h = harness(3, 3);
        h.queue.close();

        let mut slots = Vec::new();
        for attempt in 1..=3 {
            match h.recovery.handle(failed(2, 1, attempt)).await {
                Decision::Reassigned { slot, retry } => {
                    assert_eq!(retry, attempt);
                    slots.push(slot);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(slots, vec![1, 2, 3]);
        assert_eq!(
            h.recovery.handle(failed(2, 3, 4)).await,
            Decision::Exhausted { attempts: 4 }
        );
        assert_eq!(h.recovery.ledger().failures(2), 4);
        assert_eq!(h.recovery.ledger().failures(1), 0);
        h.workers.join().await;
    }

    #[tokio::test]
    async fn replacement_worker_runs_reassigned_item() {
        let mut h = harness(2, 2);

        let d = h.recovery.handle(failed(1, 2, 1)).await;
        assert_eq!(d, Decision::Reassigned { slot: 1, retry: 1 });

        let c = h.conclusions.recv().await.unwrap();
        assert_eq!(c.task, 1);
        assert_eq!(c.outcome, TaskOutcome::Succeeded { attempts: 2 });

        h.queue.close();
        h.workers.join().await;
        assert_eq!(h.workers.live(), 0);
    }

    #[tokio::test]
    async fn run_exits_on_close_and_returns_ledger() {
        let h = harness(1, 5);
        let (tx, rx) = mpsc::channel(4);
        let closed = CancellationToken::new();

        tx.send(failed(1, 1, 1)).await.unwrap();
        tx.send(failed(1, 1, 2)).await.unwrap();
        h.queue.close();
        closed.cancel();

        let ledger = h.recovery.run(rx, closed).await;
        assert_eq!(ledger.failures(1), 2);
        h.workers.join().await;
    }
}
