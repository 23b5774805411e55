//! # Round-robin slot selection.
//!
//! [`RoundRobin`] cycles over the worker id space `1..=W`. The first call yields `1`.
//! It is owned by the recovery loop and advanced only on reassignment.

use std::num::NonZeroUsize;

use crate::tasks::WorkerId;

/// Cyclic selector over `1..=slots`.
///
/// # Example
/// ```
/// use std::num::NonZeroUsize;
/// use retrypool::RoundRobin;
///
/// let mut rr = RoundRobin::new(NonZeroUsize::new(2).unwrap());
/// assert_eq!(rr.next_slot(), 1);
/// assert_eq!(rr.next_slot(), 2);
/// assert_eq!(rr.next_slot(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct RoundRobin {
    slots: NonZeroUsize,
    last: usize,
}

impl RoundRobin {
    /// Creates a selector that has not handed out any slot yet.
    pub fn new(slots: NonZeroUsize) -> Self {
        Self { slots, last: 0 }
    }

    /// Returns the next slot id.
    pub fn next_slot(&mut self) -> WorkerId {
        self.last = (self.last % self.slots.get()) + 1;
        self.last
    }

    /// Number of slots in the cycle.
    pub fn slots(&self) -> usize {
        self.slots.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_every_slot_in_order() {
        let mut rr = RoundRobin::new(NonZeroUsize::new(3).unwrap());
        let seen: Vec<_> = (0..7).map(|_| rr.next_slot()).collect();
        assert_eq!(seen, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn single_slot_always_one() {
        let mut rr = RoundRobin::new(NonZeroUsize::MIN);
        assert!((0..5).all(|_| rr.next_slot() == 1));
        assert_eq!(rr.slots(), 1);
    }
}
