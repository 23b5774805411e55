//! # LogWriter — progress notifications as `tracing` records
//!
//! A minimal subscriber that turns incoming [`Event`]s into structured log lines.
//! Install any `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO retrypool: starting task=1 worker=2 attempt=1
//! WARN retrypool: failed task=1 worker=2 attempt=1 reason="simulated failure"
//! INFO retrypool: reassigned task=1 worker=1 retry=1
//! INFO retrypool: completed task=1 worker=1 attempt=2
//! WARN retrypool: exhausted task=3 attempts=4
//! INFO retrypool: all-concluded
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let tag = e.kind.as_tag();
        match e.kind {
            EventKind::TaskStarting | EventKind::TaskCompleted => {
                info!(target: "retrypool", task = e.task, worker = e.worker, attempt = e.attempt, "{tag}");
            }
            EventKind::TaskFailed => {
                warn!(
                    target: "retrypool",
                    task = e.task,
                    worker = e.worker,
                    attempt = e.attempt,
                    reason = e.reason.as_deref(),
                    "{tag}"
                );
            }
            EventKind::TimeoutHit => {
                warn!(target: "retrypool", task = e.task, worker = e.worker, timeout_ms = e.timeout_ms, "{tag}");
            }
            EventKind::TaskReassigned => {
                info!(target: "retrypool", task = e.task, worker = e.worker, retry = e.attempt, "{tag}");
            }
            EventKind::TaskExhausted => {
                warn!(target: "retrypool", task = e.task, attempts = e.attempt, "{tag}");
            }
            EventKind::WorkerSpawned => {
                info!(target: "retrypool", worker = e.worker, "{tag}");
            }
            EventKind::WorkerRetired => {
                info!(target: "retrypool", worker = e.worker, task = e.task, "{tag}");
            }
            EventKind::AllConcluded => {
                info!(target: "retrypool", "{tag}");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                warn!(
                    target: "retrypool",
                    subscriber = e.subscriber.unwrap_or("unknown"),
                    reason = e.reason.as_deref().unwrap_or("unknown"),
                    "{tag}"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
