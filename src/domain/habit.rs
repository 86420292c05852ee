use super::streak::StreakCounter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Stable identifier assigned to a habit at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(Uuid);

impl HabitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an ID previously rendered with `Display`
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked habit with its per-day history and cached streak counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique ID, never changes after creation
    pub id: HabitId,
    /// Display name (unique case-insensitively across the store)
    pub name: String,
    /// Cached streak, always equal to the replay of `history`
    pub streak: u32,
    /// Checked for the current, not-yet-submitted day
    #[serde(default)]
    pub completed: bool,
    /// Day number -> completed (true) or missed (false)
    #[serde(default)]
    pub history: BTreeMap<u32, bool>,
    /// Most recent day the habit was completed
    #[serde(default)]
    pub last_completed: Option<u32>,
    /// Most recent day the habit was missed
    #[serde(default)]
    pub last_failed: Option<u32>,
    /// Consecutive misses, cleared by a completion
    #[serde(default)]
    pub missed_days: u32,
    /// Day the habit was created on
    pub start_day: u32,
}

impl Habit {
    pub fn new(name: String, start_day: u32) -> Self {
        Self {
            id: HabitId::new(),
            name,
            streak: 0,
            completed: false,
            history: BTreeMap::new(),
            last_completed: None,
            last_failed: None,
            missed_days: 0,
            start_day,
        }
    }

    /// Case-insensitive name comparison
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Close out `day` for this habit using the current `completed` mark
    pub fn submit(&mut self, day: u32) {
        let completed = self.completed;
        self.history.insert(day, completed);

        let mut counter = self.counter();
        counter.apply(completed);
        self.streak = counter.streak;
        self.missed_days = counter.missed_days;

        if completed {
            self.last_completed = Some(day);
        } else {
            self.last_failed = Some(day);
        }
        self.completed = false;
    }

    /// Outcome recorded for `day`, if it was submitted while the habit existed
    pub fn outcome(&self, day: u32) -> Option<bool> {
        self.history.get(&day).copied()
    }

    /// Number of submitted days since the habit was created
    pub fn days_tracked(&self, current_day: u32) -> u32 {
        current_day.saturating_sub(self.start_day)
    }

    /// Replay recorded history for days `start_day..=upto_day`
    pub fn replay_until(&self, upto_day: u32) -> StreakCounter {
        if upto_day < self.start_day {
            return StreakCounter::new();
        }
        StreakCounter::replay(self.history.range(self.start_day..=upto_day).map(|(_, &done)| done))
    }

    fn counter(&self) -> StreakCounter {
        StreakCounter {
            streak: self.streak,
            missed_days: self.missed_days,
        }
    }
}
