//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use retrypool::{AttemptError, Event, EventKind, Execute, Subscribe, Task, TaskId};

/// Executor replaying per-task verdicts (`true` = success).
///
/// Once a task's script runs out, every further attempt uses `fallback`.
pub struct ScriptedWork {
    scripts: Mutex<HashMap<TaskId, VecDeque<bool>>>,
    calls: Mutex<Vec<TaskId>>,
    fallback: bool,
}

impl ScriptedWork {
    pub fn new(fallback: bool) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fallback,
        }
    }

    pub fn always_ok() -> Arc<Self> {
        Arc::new(Self::new(true))
    }

    pub fn always_fail() -> Arc<Self> {
        Arc::new(Self::new(false))
    }

    pub fn script(self, id: TaskId, verdicts: impl IntoIterator<Item = bool>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(id, verdicts.into_iter().collect());
        self
    }

    /// Number of attempts executed for `id`.
    pub fn calls_for(&self, id: TaskId) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == id).count()
    }

    fn verdict(&self, id: TaskId) -> bool {
        self.calls.lock().unwrap().push(id);
        self.scripts
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(self.fallback)
    }
}

#[async_trait]
impl Execute for ScriptedWork {
    async fn execute(&self, task: &Task, _ctx: CancellationToken) -> Result<(), AttemptError> {
        if self.verdict(task.id()) {
            Ok(())
        } else {
            Err(AttemptError::fail(format!("scripted failure of task {}", task.id())))
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Subscriber keeping every event it receives, in delivery order.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.lock().unwrap().iter().filter(|e| e.kind == kind).count()
    }

    pub fn of(&self, kind: EventKind) -> Vec<Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

/// Batch of tasks `1..=n` with payload `"Task {id}"`.
pub fn batch(n: u64) -> Vec<Task> {
    (1..=n).map(|id| Task::new(id, format!("Task {id}"))).collect()
}

/// Installs a test log subscriber honoring `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
