use crate::domain::{Habit, HabitId};
use crate::metrics::{average_streak_series, streak_series};

/// Streak line for one habit
#[derive(Debug, Clone, PartialEq)]
pub struct StreakDataset {
    pub habit_id: HabitId,
    pub label: String,
    /// One point per submitted day, `None` before the habit started
    pub points: Vec<Option<u32>>,
}

/// Data behind the streak chart
#[derive(Debug, Clone, PartialEq)]
pub struct StreakChart {
    pub labels: Vec<String>,
    pub datasets: Vec<StreakDataset>,
    /// Average streak across started habits per day
    pub average: Vec<Option<f64>>,
}

/// Build chart data over every submitted day, `None` before the first submission
pub fn build_chart(habits: &[Habit], current_day: u32) -> Option<StreakChart> {
    let submitted_days = current_day.saturating_sub(1);
    if submitted_days < 1 {
        return None;
    }

    let labels = (1..=submitted_days).map(|day| format!("Day {}", day)).collect();
    let datasets = habits
        .iter()
        .map(|habit| StreakDataset {
            habit_id: habit.id,
            label: habit.name.clone(),
            points: streak_series(habit, submitted_days),
        })
        .collect();

    Some(StreakChart {
        labels,
        datasets,
        average: average_streak_series(habits, submitted_days),
    })
}
