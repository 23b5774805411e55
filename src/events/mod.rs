//! Pool events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to the progress notifications emitted by workers, the
//! recovery loop and the pool.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Worker`, `runner::run_once`, `RecoveryLoop`, `Pool::run`,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the fan-out listener spawned by `Pool::run`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
