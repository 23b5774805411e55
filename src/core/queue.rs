//! # Work queue shared by all workers.
//!
//! [`WorkQueue`] is a bounded FIFO of [`WorkItem`]s with many producers (the pool's
//! initial fill, the recovery loop's re-enqueues) and many consumers (workers).
//!
//! ## Architecture
//! ```text
//! Pool::run ──push──┐                              ┌──► Worker 1
//!                   ├──► mpsc (cap = batch) ──► Mutex<Receiver> ──► Worker 2
//! RecoveryLoop ─push┘                              └──► Worker N
//!                                ▲
//!                   close() ─────┘ (CancellationToken)
//! ```
//!
//! ## Rules
//! - Close is explicit and one-way: after [`close`](WorkQueue::close), `push` is refused
//!   and [`next`](WorkQueue::next) returns the remaining items, then `None`.
//! - Consumers take turns on the receiver; a waiting consumer holds the lock, the
//!   others queue behind it. Order of items is preserved (pure FIFO).
//! - The pool closes the queue only after every task has reached a terminal state,
//!   so no re-enqueue can race the close.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::tasks::Task;

/// A task waiting for a worker, tagged with the attempt it will become.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Task to run.
    pub task: Task,
    /// Attempt number this pull starts (1-based).
    pub attempt: u32,
}

impl WorkItem {
    /// First attempt of a task.
    pub fn first(task: Task) -> Self {
        Self { task, attempt: 1 }
    }
}

/// Bounded multi-producer multi-consumer queue of [`WorkItem`]s.
#[derive(Clone)]
pub struct WorkQueue {
    tx: mpsc::Sender<WorkItem>,
    rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    closed: CancellationToken,
}

impl WorkQueue {
    /// Creates an open queue with the given capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            closed: CancellationToken::new(),
        }
    }

    /// Enqueues an item, waiting for room if the queue is full.
    ///
    /// Returns the item back if the queue is closed.
    pub async fn push(&self, item: WorkItem) -> Result<(), WorkItem> {
        if self.is_closed() {
            return Err(item);
        }
        self.tx.send(item).await.map_err(|e| e.0)
    }

    /// Takes the next item; `None` once the queue is closed and empty.
    pub async fn next(&self) -> Option<WorkItem> {
        let mut rx = self.rx.lock().await;
        tokio::select! {
            biased;
            item = rx.recv() => item,
            _ = self.closed.cancelled() => rx.try_recv().ok(),
        }
    }

    /// Closes the queue. Idempotent.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// True once [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}
