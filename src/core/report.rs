//! # Final report of a pool run.
//!
//! Every task of the batch ends in exactly one [`TaskOutcome`]. The report also keeps
//! the retry ledger snapshot (failures per task) handed back by the recovery loop.

use std::collections::{BTreeMap, HashMap};

use crate::tasks::TaskId;

/// Terminal state of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// An attempt succeeded.
    Succeeded {
        /// Total attempts, including the successful one.
        attempts: u32,
    },
    /// The retry bound was exceeded; the task was dropped uncompleted.
    Exhausted {
        /// Total (failed) attempts.
        attempts: u32,
    },
}

impl TaskOutcome {
    /// Attempts made for the task.
    pub fn attempts(&self) -> u32 {
        match *self {
            TaskOutcome::Succeeded { attempts } | TaskOutcome::Exhausted { attempts } => attempts,
        }
    }

    /// True for [`TaskOutcome::Succeeded`].
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded { .. })
    }
}

/// Terminal event for one task, sent to the pool's join count.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Conclusion {
    pub task: TaskId,
    pub outcome: TaskOutcome,
}

/// Outcome of every task in the batch.
#[derive(Debug, Clone, Default)]
pub struct Report {
    outcomes: BTreeMap<TaskId, TaskOutcome>,
    failures: HashMap<TaskId, u32>,
}

impl Report {
    pub(crate) fn new(outcomes: BTreeMap<TaskId, TaskOutcome>, failures: HashMap<TaskId, u32>) -> Self {
        Self { outcomes, failures }
    }

    /// Outcome of a task, if it belongs to the batch.
    pub fn get(&self, id: TaskId) -> Option<TaskOutcome> {
        self.outcomes.get(&id).copied()
    }

    /// Iterates outcomes in ascending task id order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, TaskOutcome)> + '_ {
        self.outcomes.iter().map(|(id, o)| (*id, *o))
    }

    /// Ids of tasks that succeeded, ascending.
    pub fn succeeded(&self) -> Vec<TaskId> {
        self.iter()
            .filter(|(_, o)| o.is_success())
            .map(|(id, _)| id)
            .collect()
    }

    /// Ids of tasks that exhausted their retries, ascending.
    pub fn exhausted(&self) -> Vec<TaskId> {
        self.iter()
            .filter(|(_, o)| !o.is_success())
            .map(|(id, _)| id)
            .collect()
    }

    /// Failed attempts recorded in the retry ledger for `id`.
    pub fn failures(&self, id: TaskId) -> u32 {
        self.failures.get(&id).copied().unwrap_or(0)
    }

    /// Sum of attempts over all tasks.
    pub fn total_attempts(&self) -> u64 {
        self.outcomes.values().map(|o| u64::from(o.attempts())).sum()
    }

    /// Number of tasks in the report.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True if the report holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_by_outcome() {
        let outcomes = BTreeMap::from([
            (3, TaskOutcome::Exhausted { attempts: 2 }),
            (1, TaskOutcome::Succeeded { attempts: 1 }),
            (2, TaskOutcome::Succeeded { attempts: 3 }),
        ]);
        let failures = HashMap::from([(1, 0), (2, 2), (3, 2)]);
        let report = Report::new(outcomes, failures);

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded(), vec![1, 2]);
        assert_eq!(report.exhausted(), vec![3]);
        assert_eq!(report.total_attempts(), 6);
        assert_eq!(report.failures(2), 2);
        assert_eq!(report.get(9), None);
    }
}
