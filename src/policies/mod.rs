//! Retry and reassignment policies.
//!
//! This module groups the knobs that control **whether** a failed task is tried
//! again and **which** worker slot receives the replacement executor.
//!
//! ## Contents
//! - [`RetryPolicy`] how many failed attempts a task may accumulate before it is exhausted
//! - [`RoundRobin`]  cyclic slot selection over the fixed worker id space `1..=W`
//!
//! ## Quick wiring
//! ```text
//! Attempt(Failure) ──► RecoveryLoop
//!      ├─► ledger.record_failure(id) = n
//!      ├─► RetryPolicy::allows(n)?
//!      │      ├─ yes ─► RoundRobin::next_slot() = slot ─► spawn replacement, re-enqueue
//!      │      └─ no  ─► exhausted
//! ```

mod retry;
mod round_robin;

pub use retry::RetryPolicy;
pub use round_robin::RoundRobin;
