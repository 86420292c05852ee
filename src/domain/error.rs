use super::habit::HabitId;
use thiserror::Error;

/// Recoverable failures reported by tracker operations.
///
/// None of these leave partial state behind: the operation that returns one performed no
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("This habit already exists: {0}")]
    DuplicateName(String),

    #[error("Habit not found: {0}")]
    NotFound(HabitId),

    #[error("Habit name is required")]
    EmptyName,

    #[error("No submission to undo.")]
    NothingToUndo,

    #[error("No submission to redo.")]
    NothingToRedo,
}

impl TrackerError {
    /// Undo or redo was requested with nothing on the corresponding stack
    pub fn is_empty_stack(&self) -> bool {
        matches!(self, Self::NothingToUndo | Self::NothingToRedo)
    }
}

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
