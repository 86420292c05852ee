//! Day submission state machine.
//!
//! The tracker is always waiting for day `current_day` to be submitted. Submission is the only
//! forward transition; undo and redo swap in whole saved states instead of reversing
//! field-by-field.

use crate::domain::{DayHistoryLog, DayRecord, HabitStore, TrackerError, TrackerResult};
use crate::undo::UndoRedoManager;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The mutable aggregate that submissions change and snapshots copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerState {
    pub habits: HabitStore,
    pub current_day: u32,
    pub day_history: DayHistoryLog,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            habits: HabitStore::new(),
            current_day: 1,
            day_history: DayHistoryLog::new(),
        }
    }
}

/// Result of closing out a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    /// The day that was submitted
    pub day: u32,
    pub completed: usize,
    pub total: usize,
    /// Rounded percentage of habits completed, 0 with no habits
    pub percent: u8,
}

/// round(100 * completed / total), 0 when there is nothing to complete
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u8
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checkpoint the current state, then close out the current day
    pub fn submit_day(&mut self, history: &mut UndoRedoManager) -> SubmissionSummary {
        history.checkpoint(self.clone());

        let day = self.current_day;
        let total = self.habits.len();
        let completed = self.habits.completed_count();
        let percent = completion_percent(completed, total);

        let records = self
            .habits
            .iter()
            .map(|habit| DayRecord {
                habit_id: habit.id,
                completed: habit.completed,
            })
            .collect();
        self.day_history.record_day(day, records);

        for habit in self.habits.iter_mut() {
            habit.submit(day);
        }
        self.current_day += 1;

        debug!(day, completed, total, percent, "day submitted");
        SubmissionSummary {
            day,
            completed,
            total,
            percent,
        }
    }

    /// Restore the state from before the last submission
    pub fn undo(&mut self, history: &mut UndoRedoManager) -> TrackerResult<()> {
        if !history.can_undo() {
            return Err(TrackerError::NothingToUndo);
        }
        let previous = history.undo(self.clone())?;
        *self = previous;
        self.day_history.truncate_from(self.current_day);
        debug!(day = self.current_day, "submission undone");
        Ok(())
    }

    /// Re-apply the most recently undone submission
    pub fn redo(&mut self, history: &mut UndoRedoManager) -> TrackerResult<()> {
        if !history.can_redo() {
            return Err(TrackerError::NothingToRedo);
        }
        let next = history.redo(self.clone())?;
        *self = next;
        debug!(day = self.current_day, "submission redone");
        Ok(())
    }
}
