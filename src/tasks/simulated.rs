//! # Simulated work.
//!
//! [`SimulatedWork`] is a randomized [`Execute`] implementation for demos and
//! load experiments: each attempt fails with a fixed probability, and a
//! successful attempt sleeps for a latency drawn uniformly from a range.
//!
//! Failures are reported immediately, before any simulated work, so a doomed
//! attempt never holds a worker for the latency window.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::error::AttemptError;
use crate::tasks::{execute::Execute, task::Task};

/// Randomized verdict source with simulated latency.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use retrypool::SimulatedWork;
///
/// let work = SimulatedWork::new(0.3)
///     .with_latency(Duration::from_millis(10), Duration::from_millis(30));
/// assert_eq!(work.failure_probability(), 0.3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SimulatedWork {
    failure_probability: f64,
    min_latency: Duration,
    max_latency: Duration,
}

impl Default for SimulatedWork {
    /// 30% failures, 1-3 s latency.
    fn default() -> Self {
        Self {
            failure_probability: 0.3,
            min_latency: Duration::from_secs(1),
            max_latency: Duration::from_secs(3),
        }
    }
}

impl SimulatedWork {
    /// Creates a source failing with probability `p` (clamped to `[0, 1]`) and no latency.
    pub fn new(p: f64) -> Self {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        Self {
            failure_probability: p,
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
        }
    }

    /// Sets the latency range for successful attempts. Bounds are swapped if reversed.
    pub fn with_latency(mut self, min: Duration, max: Duration) -> Self {
        self.min_latency = min.min(max);
        self.max_latency = min.max(max);
        self
    }

    /// Returns the configured failure probability.
    pub fn failure_probability(&self) -> f64 {
        self.failure_probability
    }

    /// Draws one verdict and a latency.
    ///
    /// Kept synchronous: the thread-local rng must not live across an await.
    fn draw(&self) -> (bool, Duration) {
        let mut rng = rand::rng();
        let fails = rng.random_bool(self.failure_probability);
        let min_ms = self.min_latency.as_millis() as u64;
        let max_ms = self.max_latency.as_millis() as u64;
        let latency = if max_ms > min_ms {
            Duration::from_millis(rng.random_range(min_ms..=max_ms))
        } else {
            self.min_latency
        };
        (fails, latency)
    }
}

#[async_trait]
impl Execute for SimulatedWork {
    async fn execute(&self, _task: &Task, ctx: CancellationToken) -> Result<(), AttemptError> {
        let (fails, latency) = self.draw();
        if fails {
            return Err(AttemptError::fail("simulated failure"));
        }
        if latency > Duration::ZERO {
            tokio::select! {
                _ = tokio::time::sleep(latency) => {}
                _ = ctx.cancelled() => return Err(AttemptError::fail("cancelled during simulated work")),
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "SimulatedWork"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_is_clamped() {
        assert_eq!(SimulatedWork::new(1.7).failure_probability(), 1.0);
        assert_eq!(SimulatedWork::new(-0.2).failure_probability(), 0.0);
        assert_eq!(SimulatedWork::new(f64::NAN).failure_probability(), 0.0);
    }

    #[test]
    fn latency_stays_in_range() {
        let work = SimulatedWork::new(0.0)
            .with_latency(Duration::from_millis(40), Duration::from_millis(10));
        for _ in 0..200 {
            let (fails, latency) = work.draw();
            assert!(!fails);
            assert!(latency >= Duration::from_millis(10));
            assert!(latency <= Duration::from_millis(40));
        }
    }

    #[tokio::test]
    async fn certain_failure_and_certain_success() {
        let token = CancellationToken::new();
        let task = Task::new(1, "x");

        let always_fail = SimulatedWork::new(1.0);
        assert!(always_fail.execute(&task, token.clone()).await.is_err());

        let never_fail = SimulatedWork::new(0.0);
        assert!(never_fail.execute(&task, token).await.is_ok());
    }
}
