use std::collections::VecDeque;

/// Bounded undo/redo stacks of configuration snapshots.
///
/// `past` holds the state *before* each committed change, newest last.
/// A coalesced burst keeps its before-state in `pending` until the quiet
/// period ends and [`History::commit_pending`] pushes it.
#[derive(Debug, Clone)]
pub struct History<S> {
    past: VecDeque<S>,
    future: Vec<S>,
    pending: Option<S>,
    capacity: usize,
}

impl<S: Clone> History<S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(capacity.min(64)),
            future: Vec::new(),
            pending: None,
            capacity: capacity.max(1),
        }
    }

    /// Commit `before` as one undo step. Clears redo and evicts the oldest
    /// entry past capacity.
    pub fn record(&mut self, before: S) {
        self.past.push_back(before);
        self.future.clear();
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
    }

    /// Start or continue a burst. The snapshot is only taken for the first
    /// call of a burst; returns whether it was taken now.
    pub fn begin_burst(&mut self, before: impl FnOnce() -> S) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(before());
        true
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Commit the burst's before-state, if a burst is open.
    pub fn commit_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(before) => {
                self.record(before);
                true
            }
            None => false,
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Step back: `current` goes onto the redo stack and the newest past
    /// state is returned for restoring. An open burst is committed first.
    pub fn undo(&mut self, current: S) -> Option<S> {
        self.commit_pending();
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: S) -> Option<S> {
        self.commit_pending();
        let next = self.future.pop()?;
        self.past.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty() || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty() && self.pending.is_none()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_and_redo_walk_the_stacks() {
        let mut h = History::new(25);
        h.record(0);
        h.record(1);
        // live state is 2
        assert_eq!(h.undo(2), Some(1));
        assert_eq!(h.undo(1), Some(0));
        assert_eq!(h.undo(0), None);
        assert_eq!(h.redo(0), Some(1));
        assert_eq!(h.redo(1), Some(2));
        assert_eq!(h.redo(2), None);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = History::new(25);
        for i in 0..26 {
            h.record(i);
        }
        assert_eq!(h.undo_len(), 25);
        let mut last = None;
        let mut current = 26;
        while let Some(prev) = h.undo(current) {
            last = Some(prev);
            current = prev;
        }
        assert_eq!(last, Some(1));
    }

    #[test]
    fn new_commit_clears_future() {
        let mut h = History::new(25);
        h.record("a");
        h.record("b");
        h.undo("c");
        assert!(h.can_redo());
        h.record("b2");
        assert!(!h.can_redo());
        assert_eq!(h.redo("x"), None);
    }

    #[test]
    fn burst_keeps_first_snapshot() {
        let mut h = History::new(25);
        assert!(h.begin_burst(|| "before"));
        assert!(!h.begin_burst(|| "later"));
        assert!(h.commit_pending());
        assert!(!h.commit_pending());
        assert_eq!(h.undo("now"), Some("before"));
    }

    #[test]
    fn undo_flushes_open_burst() {
        let mut h = History::new(25);
        h.record(0);
        h.begin_burst(|| 1);
        assert!(h.can_undo());
        assert_eq!(h.undo(2), Some(1));
        assert_eq!(h.undo(1), Some(0));
    }

    #[test]
    fn cancel_drops_burst() {
        let mut h: History<u8> = History::new(25);
        h.begin_burst(|| 1);
        h.cancel_pending();
        assert!(!h.has_pending());
        assert!(!h.can_undo());
    }
}
