use crate::domain::{Habit, HabitId};
use crate::metrics::{completed_days_since, completion_rate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column the habit table is sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Streak,
    Completion,
    LastCompleted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Header glyph for the active column
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

/// Search and sort state of the table view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl TableQuery {
    /// Clicking a header: same column flips direction, a new column starts ascending
    pub fn sort_by(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn matches(&self, habit: &Habit) -> bool {
        habit.name.to_lowercase().contains(&self.search.to_lowercase())
    }
}

/// When a habit was last completed, relative to the day being marked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastCompleted {
    Never,
    /// Days between the completion and the last submitted day
    DaysAgo(u32),
}

impl LastCompleted {
    pub fn for_habit(habit: &Habit, current_day: u32) -> Self {
        match habit.last_completed {
            Some(day) => Self::DaysAgo(current_day.saturating_sub(day + 1)),
            None => Self::Never,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Never => "Never".to_string(),
            Self::DaysAgo(days) => days_ago_label(*days),
        }
    }
}

fn days_ago_label(days: u32) -> String {
    match days {
        0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    }
}

/// One habit row of the table
#[derive(Debug, Clone, PartialEq)]
pub struct HabitRow {
    pub id: HabitId,
    pub name: String,
    pub streak: u32,
    pub completed_days: u32,
    pub days_tracked: u32,
    /// Rounded percentage, `None` before the first submitted day
    pub completion_percent: Option<u32>,
    pub last_completed: LastCompleted,
}

impl HabitRow {
    pub fn completion_label(&self) -> String {
        percent_label(self.completion_percent)
    }
}

/// Bottom row averaging the visible rows
#[derive(Debug, Clone, PartialEq)]
pub struct AverageRow {
    pub streak: u32,
    /// `None` when no rows are visible
    pub completion_percent: Option<u32>,
    /// Mean days since last completion (since start for never-completed habits)
    pub days_since_completion: u32,
}

impl AverageRow {
    pub fn completion_label(&self) -> String {
        percent_label(self.completion_percent)
    }

    pub fn last_completed_label(&self) -> String {
        days_ago_label(self.days_since_completion)
    }
}

fn percent_label(percent: Option<u32>) -> String {
    match percent {
        Some(p) => format!("{}%", p),
        None => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HabitTable {
    pub rows: Vec<HabitRow>,
    pub average: AverageRow,
}

/// Filter, sort and summarise habits for the table view
pub fn build_table(habits: &[Habit], current_day: u32, query: &TableQuery) -> HabitTable {
    let mut visible: Vec<&Habit> = habits.iter().filter(|h| query.matches(h)).collect();
    visible.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_field, current_day);
        match query.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let rows = visible
        .iter()
        .map(|habit| HabitRow {
            id: habit.id,
            name: habit.name.clone(),
            streak: habit.streak,
            completed_days: completed_days_since(habit, current_day),
            days_tracked: habit.days_tracked(current_day),
            completion_percent: completion_rate(habit, current_day)
                .map(|rate| (rate * 100.0).round() as u32),
            last_completed: LastCompleted::for_habit(habit, current_day),
        })
        .collect();

    HabitTable {
        rows,
        average: average_row(&visible, current_day),
    }
}

fn sort_rate(habit: &Habit, current_day: u32) -> f64 {
    completion_rate(habit, current_day).unwrap_or(0.0)
}

fn compare(a: &Habit, b: &Habit, field: SortField, current_day: u32) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Streak => a.streak.cmp(&b.streak),
        SortField::Completion => sort_rate(a, current_day)
            .partial_cmp(&sort_rate(b, current_day))
            .unwrap_or(Ordering::Equal),
        SortField::LastCompleted => a
            .last_completed
            .unwrap_or(0)
            .cmp(&b.last_completed.unwrap_or(0)),
    }
}

fn average_row(habits: &[&Habit], current_day: u32) -> AverageRow {
    if habits.is_empty() {
        return AverageRow {
            streak: 0,
            completion_percent: None,
            days_since_completion: 0,
        };
    }

    let count = habits.len() as f64;
    let streak_sum: f64 = habits.iter().map(|h| f64::from(h.streak)).sum();
    let completion_sum: f64 = habits.iter().map(|h| sort_rate(h, current_day) * 100.0).sum();
    let since_sum: f64 = habits
        .iter()
        .map(|h| {
            let since = match h.last_completed {
                Some(day) => current_day.saturating_sub(day + 1),
                None => h.days_tracked(current_day),
            };
            f64::from(since)
        })
        .sum();

    AverageRow {
        streak: (streak_sum / count).round() as u32,
        completion_percent: Some((completion_sum / count).round() as u32),
        days_since_completion: (since_sum / count).round() as u32,
    }
}
