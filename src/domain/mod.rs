pub mod day_log;
pub mod error;
pub mod habit;
pub mod store;
pub mod streak;
pub mod views;

pub use day_log::{DayHistoryLog, DayRecord};
pub use error::{TrackerError, TrackerResult};
pub use habit::{Habit, HabitId};
pub use store::HabitStore;
pub use streak::StreakCounter;
pub use views::{display_order, needs_attention};
