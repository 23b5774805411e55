//! # retrypool
//!
//! **retrypool** is a bounded worker pool that runs a fixed batch of independent
//! tasks concurrently, detects per-attempt failures, and redistributes failed tasks
//! to replacement workers until each task either succeeds or exhausts its retries.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────┐  ┌──────────┐  ┌──────────┐
//!     │  Task 1  │  │  Task 2  │  │  Task N  │        (static batch)
//!     └────┬─────┘  └────┬─────┘  └────┬─────┘
//!          ▼             ▼             ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Pool::run (dispatcher)                                       │
//! │  - validates input, zero-initialises the RetryLedger          │
//! │  - starts RecoveryLoop, then Worker 1..=W                     │
//! │  - enqueues every task once                                   │
//! │  - counts terminal conclusions (join count) to gate shutdown  │
//! └──────┬────────────────────────────────────────────────────────┘
//!        ▼
//! ┌──────────────────────────┐   pull    ┌──────────┐ ┌──────────┐
//! │ WorkQueue (cap = batch)  │ ────────► │ Worker 1 │ │ Worker W │
//! └──────────────────────────┘           └────┬─────┘ └────┬─────┘
//!        ▲                                    │ failure    │ success
//!        │ re-enqueue + spawn replacement     ▼            ▼
//! ┌──────┴──────────────┐  ◄──────── FailureQueue     conclusions
//! │ RecoveryLoop        │                                  ▲
//! │ (owns RetryLedger)  │ ── exhausted ────────────────────┘
//! └─────────────────────┘
//! ```
//!
//! ### Per-task lifecycle
//! ```text
//! Pending ─► attempt ─┬─ Success ─► Succeeded
//!                     └─ Failure ─► ledger += 1
//!                                    ├─ ledger <= max_retries ─► Pending (replacement worker, round-robin slot)
//!                                    └─ ledger >  max_retries ─► Exhausted
//! ```
//!
//! A failure retires the worker instance that saw it; the recovery loop always
//! spawns a replacement, so `W` workers stay alive while work remains.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                        |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------|
//! | **Pool**          | Run a batch to completion, get a per-task report.            | [`Pool`], [`PoolBuilder`], [`Report`]     |
//! | **Execution**     | Plug in the verdict source for each attempt.                 | [`Execute`], [`ExecuteFn`], [`SimulatedWork`] |
//! | **Policies**      | Retry bound and round-robin reassignment.                    | [`RetryPolicy`], [`RoundRobin`]           |
//! | **Subscriber API**| Observe progress notifications.                              | [`Subscribe`], [`Event`], [`EventKind`]   |
//! | **Errors**        | Typed errors for rejected input and failed attempts.         | [`PoolError`], [`AttemptError`]           |
//! | **Configuration** | Worker count, retry bound, per-attempt timeout.              | [`PoolConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber (emits `tracing` records).
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use retrypool::{AttemptError, ExecuteFn, Pool, PoolConfig, Task, TaskOutcome};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let exec = ExecuteFn::arc("reject-3", |task: Task, _ctx: CancellationToken| async move {
//!         if task.id() == 3 {
//!             return Err(AttemptError::fail("unsupported"));
//!         }
//!         Ok(())
//!     });
//!
//!     let pool = Pool::builder(PoolConfig::new(2, 1), exec).build();
//!     let batch = (1..=4).map(|id| Task::new(id, format!("Task {id}"))).collect();
//!     let report = pool.run(batch).await?;
//!
//!     assert_eq!(report.get(3), Some(TaskOutcome::Exhausted { attempts: 2 }));
//!     assert_eq!(report.succeeded(), vec![1, 2, 4]);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use core::{Pool, PoolBuilder, PoolConfig, Report, RetryLedger, TaskOutcome};
pub use error::{AttemptError, PoolError};
pub use events::{Bus, Event, EventKind};
pub use policies::{RetryPolicy, RoundRobin};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{
    Attempt, Execute, ExecuteFn, ExecuteRef, Outcome, SimulatedWork, Task, TaskId, WorkerId,
};

// Optional: expose a built-in `tracing` logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
