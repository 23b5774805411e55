//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom handlers into the pool's
//! notification stream. Each subscriber is driven by a dedicated worker loop fed by a
//! bounded queue that is owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) – they do **not** block workers,
//!   the recovery loop, nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** and a `SubscriberOverflow` event is published.
//! - Every event published before [`Pool::run`](crate::Pool::run) returns is
//!   handed to the subscriber before `run` returns (unless dropped on overflow).

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use async_trait::async_trait;
/// use retrypool::{Event, EventKind, Subscribe};
///
/// #[derive(Default)]
/// struct ExhaustedCounter(AtomicUsize);
///
/// #[async_trait]
/// impl Subscribe for ExhaustedCounter {
///     async fn on_event(&self, ev: &Event) {
///         if ev.kind == EventKind::TaskExhausted {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
///     fn name(&self) -> &'static str { "exhausted-counter" }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
