//! # Retry bound.
//!
//! [`RetryPolicy`] caps the number of **re**-tries per task. A task may be attempted
//! at most `max_retries + 1` times: the first attempt plus `max_retries` reassignments.
//!
//! ```text
//! max_retries = 2
//!   failure #1 → retry   (attempt 2)
//!   failure #2 → retry   (attempt 3)
//!   failure #3 → exhausted
//! ```

/// Policy deciding whether a task with `n` recorded failures gets another attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of reassignments after the first attempt.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    /// Returns `max_retries = 3`.
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given bound.
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// True if a task whose ledger reads `failures` may be tried again.
    #[inline]
    pub fn allows(&self, failures: u32) -> bool {
        failures <= self.max_retries
    }

    /// Upper bound on attempts for a single task.
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_retries_exhausts_on_first_failure() {
        let p = RetryPolicy::new(0);
        assert!(!p.allows(1));
        assert_eq!(p.max_attempts(), 1);
    }

    #[test]
    fn bound_is_inclusive() {
        let p = RetryPolicy::new(3);
        assert!(p.allows(1));
        assert!(p.allows(3));
        assert!(!p.allows(4));
        assert_eq!(p.max_attempts(), 4);
    }

    #[test]
    fn max_attempts_saturates() {
        assert_eq!(RetryPolicy::new(u32::MAX).max_attempts(), u32::MAX);
    }
}
