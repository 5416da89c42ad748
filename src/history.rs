//! Snapshot-based undo/redo.
//!
//! [`Timeline`] owns the live [`CoreState`] together with two stacks of whole
//! snapshots. Every undoable change goes through [`Timeline::commit`]; undo and
//! redo swap snapshots in and out. Derived data never enters a snapshot, so the
//! owner recomputes it after any call that returns `true` or changes state.

use crate::model::CoreState;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    present: CoreState,
    /// Undo stack, oldest first.
    past: Vec<CoreState>,
    /// Redo stack, nearest first.
    future: VecDeque<CoreState>,
    limit: Option<usize>,
}

impl Timeline {
    pub fn new(initial: CoreState) -> Self {
        Self {
            present: initial,
            ..Self::default()
        }
    }

    /// Caps the undo stack; the oldest snapshots are dropped first.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.trim();
        self
    }

    pub fn present(&self) -> &CoreState {
        &self.present
    }

    pub fn past(&self) -> &[CoreState] {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<CoreState> {
        &self.future
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Makes `next` the live state, remembering the previous one.
    ///
    /// Clears the redo branch.
    pub fn commit(&mut self, next: CoreState) {
        let previous = std::mem::replace(&mut self.present, next);
        self.record(previous);
    }

    /// Pushes `baseline` as the undo point for changes already applied to the
    /// live state through [`present_mut`](Self::present_mut).
    pub fn record(&mut self, baseline: CoreState) {
        self.past.push(baseline);
        self.future.clear();
        self.trim();
    }

    /// Live state access for uncommitted edits (gestures). Nothing is recorded.
    pub fn present_mut(&mut self) -> &mut CoreState {
        &mut self.present
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    /// Replaces the live state and forgets all history.
    pub fn reset(&mut self, state: CoreState) {
        self.present = state;
        self.clear();
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(0..excess);
            }
        }
    }
}
