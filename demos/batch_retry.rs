//! # Example: batch_retry
//!
//! Five tasks on three workers with randomized failures (30%) and 1-3 s of simulated
//! work per successful attempt. Failed tasks are handed to replacement workers until
//! they succeed or exceed three retries.
//!
//! Demonstrates how to:
//! - Configure a [`Pool`] with [`PoolConfig`].
//! - Use [`SimulatedWork`] as the verdict source.
//! - Observe progress through the built-in [`LogWriter`] subscriber.
//!
//! ## Flow
//! ```text
//! Pool::run(batch)
//!     ├─► spawn RecoveryLoop, Worker 1..=3
//!     ├─► enqueue Task 1..=5
//!     ├─► Worker: publish(TaskStarting) ─► SimulatedWork
//!     │     ├─ ok   ─► publish(TaskCompleted)
//!     │     └─ fail ─► publish(TaskFailed) ─► RecoveryLoop
//!     │                  ├─► publish(TaskReassigned) + replacement worker
//!     │                  └─► publish(TaskExhausted)
//!     └─► publish(AllConcluded) ─► Report
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example batch_retry --features logging
//! ```

use std::sync::Arc;

use retrypool::{LogWriter, Pool, PoolConfig, SimulatedWork, Task, TaskOutcome};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Log to stdout; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 2. Three workers, three retries per task
    let cfg = PoolConfig::new(3, 3);

    // 3. Randomized verdicts: 30% failure, 1-3 s of work on success
    let work = Arc::new(SimulatedWork::default());

    // 4. Build the pool with the log subscriber
    let pool = Pool::builder(cfg, work)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    // 5. Run the batch
    let batch = (1..=5).map(|id| Task::new(id, format!("Task {id}"))).collect();
    let report = pool.run(batch).await?;

    for (id, outcome) in report.iter() {
        match outcome {
            TaskOutcome::Succeeded { attempts } => {
                println!("task {id}: completed after {attempts} attempt(s)");
            }
            TaskOutcome::Exhausted { attempts } => {
                println!("task {id}: dropped after {attempts} failed attempt(s)");
            }
        }
    }
    println!("All tasks completed");
    Ok(())
}
