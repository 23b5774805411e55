//! # Built-in subscribers
//!
//! - [`LogWriter`]: emits events as `tracing` records (demo/debug).

mod log;

pub use log::LogWriter;
