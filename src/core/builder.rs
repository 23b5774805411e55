use std::sync::Arc;

use crate::{
    core::{config::PoolConfig, pool::Pool},
    subscribers::Subscribe,
    tasks::ExecuteRef,
};

/// Builder for constructing a [`Pool`] with optional subscribers.
pub struct PoolBuilder {
    cfg: PoolConfig,
    exec: ExecuteRef,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl PoolBuilder {
    /// Creates a new builder with the given configuration and executor.
    pub fn new(cfg: PoolConfig, exec: ExecuteRef) -> Self {
        Self {
            cfg,
            exec,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive progress notifications (start, failure, completion,
    /// reassignment, exhaustion) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the pool. Nothing is spawned until [`Pool::run`].
    pub fn build(self) -> Pool {
        Pool::new(self.cfg, self.exec, self.subscribers)
    }
}
