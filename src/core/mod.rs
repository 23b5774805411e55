//! Pool core: orchestration, workers and failure recovery.
//!
//! The public API from this module is [`Pool`] (with [`PoolBuilder`] and
//! [`PoolConfig`]) and the run [`Report`].
//!
//! Internal modules:
//! - [`pool`]: validates input, seeds the batch, gates queue closing on the join count;
//! - [`worker`]: pull loop of one executor instance, retired on failure;
//! - [`runner`]: executes one attempt with timeout and event publishing;
//! - [`recovery`]: applies the retry policy and re-dispatches failed tasks;
//! - [`ledger`]: per-task failure counters owned by the recovery loop;
//! - [`queue`]: shared bounded work queue with explicit close.

mod builder;
mod config;
mod ledger;
mod pool;
mod queue;
mod recovery;
mod report;
mod runner;
mod worker;

pub use builder::PoolBuilder;
pub use config::PoolConfig;
pub use ledger::RetryLedger;
pub use pool::Pool;
pub use report::{Report, TaskOutcome};
