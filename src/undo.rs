use crate::domain::{TrackerError, TrackerResult};
use crate::engine::TrackerState;

/// Full point-in-time copy of the tracker state used as an undo/redo checkpoint
pub type Snapshot = TrackerState;

/// Two stacks of whole-state snapshots.
///
/// Depth is unbounded. Snapshots are owned values, so restoring one never aliases the
/// copies still held on either stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoRedoManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl UndoRedoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted stacks (bottom of each stack first)
    pub fn from_stacks(undo_stack: Vec<Snapshot>, redo_stack: Vec<Snapshot>) -> Self {
        Self {
            undo_stack,
            redo_stack,
        }
    }

    /// Record the state before a new submission. Any undone future is discarded.
    pub fn checkpoint(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);
    }

    /// Trade `current` for the most recent checkpoint
    pub fn undo(&mut self, current: Snapshot) -> TrackerResult<Snapshot> {
        let previous = self.undo_stack.pop().ok_or(TrackerError::NothingToUndo)?;
        self.redo_stack.push(current);
        Ok(previous)
    }

    /// Trade `current` for the most recently undone state
    pub fn redo(&mut self, current: Snapshot) -> TrackerResult<Snapshot> {
        let next = self.redo_stack.pop().ok_or(TrackerError::NothingToRedo)?;
        self.undo_stack.push(current);
        Ok(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[Snapshot] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Snapshot] {
        &self.redo_stack
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
