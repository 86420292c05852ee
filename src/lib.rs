//! Daily habit tracking core.
//!
//! Habits are marked for the current day and the day is then submitted, which folds the marks
//! into each habit's history and streak and advances the day counter. Submissions can be
//! undone and redone. A presentation layer drives [`Tracker`] and renders from its accessors,
//! [`metrics`] and [`report`].

pub mod app;
pub mod domain;
pub mod engine;
pub mod metrics;
pub mod persistence;
pub mod report;
pub mod undo;

pub use app::Tracker;
pub use domain::{DayHistoryLog, DayRecord, Habit, HabitId, HabitStore, TrackerError, TrackerResult};
pub use engine::{SubmissionSummary, TrackerState};
pub use persistence::{JsonFileStore, MemoryStore, PersistedState, StateStore};
pub use undo::{Snapshot, UndoRedoManager};
