//! # Retry ledger.
//!
//! Per-task counter of failed attempts. Created by the pool with a zero entry for
//! every task id before any worker starts, then moved into the recovery loop, which
//! is its only writer. Ownership replaces locking: the loop handles one failure at
//! a time and hands the ledger back when it exits.
//!
//! ## Rules
//! - Counters only grow, by exactly 1 per recorded failure.
//! - Success never touches the ledger.

use std::collections::HashMap;

use crate::tasks::TaskId;

/// Failure counts per task id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryLedger {
    failures: HashMap<TaskId, u32>,
}

impl RetryLedger {
    /// Creates a ledger with a zero entry for each id.
    pub fn new(ids: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            failures: ids.into_iter().map(|id| (id, 0)).collect(),
        }
    }

    /// Records one failure for `id` and returns the new count.
    ///
    /// Ids outside the batch get an entry on first failure.
    pub fn record_failure(&mut self, id: TaskId) -> u32 {
        let n = self.failures.entry(id).or_insert(0);
        *n = n.saturating_add(1);
        *n
    }

    /// Returns the number of failures recorded for `id` (`0` if unknown).
    pub fn failures(&self, id: TaskId) -> u32 {
        self.failures.get(&id).copied().unwrap_or(0)
    }

    /// Number of tracked task ids.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// True if no ids are tracked.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consumes the ledger and returns the raw counters.
    pub fn into_inner(self) -> HashMap<TaskId, u32> {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_for_every_id() {
        let ledger = RetryLedger::new([1, 2, 3]);
        assert_eq!(ledger.len(), 3);
        assert!((1..=3).all(|id| ledger.failures(id) == 0));
    }

    #[test]
    fn each_failure_adds_exactly_one() {
        let mut ledger = RetryLedger::new([7, 8]);
        assert_eq!(ledger.record_failure(7), 1);
        assert_eq!(ledger.record_failure(7), 2);
        assert_eq!(ledger.record_failure(8), 1);
        assert_eq!(ledger.record_failure(7), 3);
        assert_eq!(ledger.failures(7), 3);
        assert_eq!(ledger.failures(8), 1);
    }

    #[test]
    fn unknown_id_is_tracked_on_first_failure() {
        let mut ledger = RetryLedger::new([1]);
        assert_eq!(ledger.failures(42), 0);
        assert_eq!(ledger.record_failure(42), 1);
        assert_eq!(ledger.len(), 2);
    }
}
