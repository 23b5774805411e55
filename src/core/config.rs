//! # Pool configuration.
//!
//! Provides [`PoolConfig`], the centralized settings for one pool run.
//! All values are fixed at startup and never change while the batch runs.
//!
//! ## Sentinel values
//! - `timeout = 0s` → no per-attempt timeout
//! - `bus_capacity = 0` → clamped to 1
//! - `workers = 0` → rejected by [`Pool::run`](crate::Pool::run) with
//!   [`PoolError::ZeroWorkers`](crate::PoolError::ZeroWorkers)

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::policies::RetryPolicy;

/// Configuration for the worker pool.
///
/// ## Field semantics
/// - `workers`: Size of the worker id space `1..=workers` (must be `>= 1`)
/// - `max_retries`: Reassignments allowed per task after its first attempt
/// - `timeout`: Per-attempt timeout (`0s` = none); a timed-out attempt is a failure
/// - `bus_capacity`: Event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of concurrent worker slots.
    pub workers: usize,

    /// Maximum number of retries per task.
    ///
    /// A task is attempted at most `max_retries + 1` times.
    pub max_retries: u32,

    /// Per-attempt timeout.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = the attempt is cancelled and counted as failed when exceeded
    pub timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events
    /// skip the older ones.
    pub bus_capacity: usize,
}

impl PoolConfig {
    /// Creates a config with the given worker count and retry bound, other fields default.
    pub fn new(workers: usize, max_retries: u32) -> Self {
        Self {
            workers,
            max_retries,
            ..Self::default()
        }
    }

    /// Returns the worker count if it is valid.
    #[inline]
    pub fn worker_slots(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.workers)
    }

    /// Returns the retry policy derived from `max_retries`.
    #[inline]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
    }

    /// Returns the per-attempt timeout as an `Option`.
    #[inline]
    pub fn attempt_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for PoolConfig {
    /// Default configuration:
    ///
    /// - `workers = 3`
    /// - `max_retries = 3`
    /// - `timeout = 0s` (no timeout)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            workers: 3,
            max_retries: 3,
            timeout: Duration::ZERO,
            bus_capacity: 1024,
        }
    }
}
