use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::state::graph_state::GraphId;

/// The per-graph concerns that are debounced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Redraw,
    HistoryCommit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deadline {
    at: u64,
    seq: u64,
}

/// Cancellable one-shot tasks on a virtual millisecond clock.
///
/// At most one task exists per `(graph, kind)`; scheduling again moves its
/// deadline. Nothing fires by itself: the owner drains due tasks with
/// [`Scheduler::next_due`].
#[derive(Debug, Default)]
pub struct Scheduler {
    now: u64,
    seq: u64,
    tasks: HashMap<(GraphId, TaskKind), Deadline>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// (Re)start the task to fire `delay_ms` from now.
    pub fn schedule(&mut self, graph: GraphId, kind: TaskKind, delay_ms: u64) {
        self.seq += 1;
        let deadline = Deadline {
            at: self.now.saturating_add(delay_ms),
            seq: self.seq,
        };
        self.tasks.insert((graph, kind), deadline);
    }

    pub fn cancel(&mut self, graph: GraphId, kind: TaskKind) -> bool {
        self.tasks.remove(&(graph, kind)).is_some()
    }

    /// Drop every task of `graph`.
    pub fn cancel_graph(&mut self, graph: GraphId) {
        self.tasks.retain(|(id, _), _| *id != graph);
    }

    pub fn is_pending(&self, graph: GraphId, kind: TaskKind) -> bool {
        self.tasks.contains_key(&(graph, kind))
    }

    /// Remove and return the earliest task due at or before `until`,
    /// moving the clock to its deadline. Ties fire in scheduling order.
    pub fn next_due(&mut self, until: u64) -> Option<(GraphId, TaskKind)> {
        let (&key, &deadline) = self
            .tasks
            .iter()
            .filter(|(_, d)| d.at <= until)
            .min_by_key(|(_, d)| (d.at, d.seq))?;
        self.tasks.remove(&key);
        self.now = self.now.max(deadline.at);
        Some(key)
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
