use crate::domain::{DayHistoryLog, HabitStore};
use crate::engine::TrackerState;
use crate::undo::{Snapshot, UndoRedoManager};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Everything written to durable storage
///
/// Fields missing from an older file fall back to their empty values, with the day counter
/// starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub habits: HabitStore,
    pub current_day: u32,
    pub day_history: DayHistoryLog,
    pub undo_stack: Vec<Snapshot>,
    pub redo_stack: Vec<Snapshot>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self::capture(&TrackerState::default(), &UndoRedoManager::default())
    }
}

impl PersistedState {
    /// Copy the live state and both stacks into a blob
    pub fn capture(state: &TrackerState, history: &UndoRedoManager) -> Self {
        Self {
            habits: state.habits.clone(),
            current_day: state.current_day,
            day_history: state.day_history.clone(),
            undo_stack: history.undo_stack().to_vec(),
            redo_stack: history.redo_stack().to_vec(),
        }
    }

    pub fn into_parts(self) -> (TrackerState, UndoRedoManager) {
        let state = TrackerState {
            habits: self.habits,
            current_day: self.current_day.max(1),
            day_history: self.day_history,
        };
        let history = UndoRedoManager::from_stacks(self.undo_stack, self.redo_stack);
        (state, history)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.context("Failed to serialize tracker state")
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse tracker state")
    }
}
