//! # Batch items and the execution seam.
//!
//! This module provides the task-related types:
//! - [`Task`] - immutable unit of work (`id` + opaque payload)
//! - [`Attempt`], [`Outcome`] - record of one execution try
//! - [`Execute`] - trait supplying a verdict per attempt
//! - [`ExecuteFn`] - closure-backed executor
//! - [`SimulatedWork`] - randomized executor with simulated latency

mod execute;
mod execute_fn;
mod simulated;
mod task;

pub use execute::{Execute, ExecuteRef};
pub use execute_fn::ExecuteFn;
pub use simulated::SimulatedWork;
pub use task::{Attempt, Outcome, Task, TaskId, WorkerId};
