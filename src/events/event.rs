//! # Progress notifications emitted by workers, the recovery loop and the pool.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Attempt events**: one task on one worker (starting, completed, failed, timeout)
//! - **Recovery events**: decisions of the recovery loop (reassigned, exhausted)
//! - **Pool events**: worker lifecycle and the final all-concluded signal
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task id,
//! worker slot, attempt number and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use retrypool::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task(4)
//!     .with_worker(2)
//!     .with_attempt(1)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task, Some(4));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::tasks::{TaskId, WorkerId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of pool events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Attempt events ===
    /// A worker pulled a task and is starting an attempt.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `worker`: worker slot
    /// - `attempt`: attempt number (1-based, per task)
    TaskStarting,

    /// The attempt succeeded; the task is terminal (`Succeeded`).
    ///
    /// Sets:
    /// - `task`, `worker`, `attempt`
    TaskCompleted,

    /// The attempt failed; the worker retires and reports to the recovery loop.
    ///
    /// Sets:
    /// - `task`, `worker`, `attempt`
    /// - `reason`: failure message
    TaskFailed,

    /// The attempt exceeded the per-attempt timeout (always followed by `TaskFailed`).
    ///
    /// Sets:
    /// - `task`, `worker`, `attempt`
    /// - `timeout_ms`: configured attempt timeout (ms)
    TimeoutHit,

    // === Recovery events ===
    /// The recovery loop re-enqueued a failed task and spawned a replacement worker.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `worker`: slot of the replacement worker (round-robin)
    /// - `attempt`: retry number (ledger value after this failure)
    TaskReassigned,

    /// The task exceeded its retry bound and is dropped; the task is terminal (`Exhausted`).
    ///
    /// Sets:
    /// - `task`: task id
    /// - `attempt`: total attempts made
    TaskExhausted,

    // === Pool events ===
    /// A replacement worker instance was spawned.
    ///
    /// Sets:
    /// - `worker`: worker slot
    WorkerSpawned,

    /// A worker instance retired after a failed attempt.
    ///
    /// Sets:
    /// - `worker`: worker slot
    /// - `task`: task whose attempt failed
    WorkerRetired,

    /// Every task reached a terminal state and all workers have exited.
    AllConcluded,
}

impl EventKind {
    /// Short kebab-case tag for log lines.
    pub fn as_tag(&self) -> &'static str {
        match self {
            EventKind::SubscriberPanicked => "subscriber-panicked",
            EventKind::SubscriberOverflow => "subscriber-overflow",
            EventKind::TaskStarting => "starting",
            EventKind::TaskCompleted => "completed",
            EventKind::TaskFailed => "failed",
            EventKind::TimeoutHit => "timeout",
            EventKind::TaskReassigned => "reassigned",
            EventKind::TaskExhausted => "exhausted",
            EventKind::WorkerSpawned => "worker-spawned",
            EventKind::WorkerRetired => "worker-retired",
            EventKind::AllConcluded => "all-concluded",
        }
    }
}

/// Pool event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Task id, if applicable.
    pub task: Option<TaskId>,
    /// Worker slot, if applicable.
    pub worker: Option<WorkerId>,
    /// Attempt or retry count (see [`EventKind`] for which).
    pub attempt: Option<u32>,
    /// Attempt timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Subscriber name for subscriber events.
    pub subscriber: Option<&'static str>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            worker: None,
            attempt: None,
            timeout_ms: None,
            reason: None,
            subscriber: None,
        }
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_task(mut self, id: TaskId) -> Self {
        self.task = Some(id);
        self
    }

    /// Attaches a worker slot.
    #[inline]
    pub fn with_worker(mut self, worker: WorkerId) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow).with_reason(reason);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// True for events emitted by the subscriber machinery itself.
    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskCompleted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn timeout_is_stored_in_millis_and_saturates() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_millis(1500));
        assert_eq!(ev.timeout_ms, Some(1500));

        let huge = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(huge.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn subscriber_events_carry_name() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_event());
        assert_eq!(ev.subscriber, Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("full"));
    }
}
