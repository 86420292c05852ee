use super::habit::HabitId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One habit's outcome within a submitted day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub habit_id: HabitId,
    pub completed: bool,
}

/// Per-day record of which habits were completed, keyed by day number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayHistoryLog {
    days: BTreeMap<u32, Vec<DayRecord>>,
}

impl DayHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the records for `day`, replacing anything already there
    pub fn record_day(&mut self, day: u32, entries: Vec<DayRecord>) {
        self.days.insert(day, entries);
    }

    /// Drop every day at or after `day`
    pub fn truncate_from(&mut self, day: u32) {
        self.days.retain(|&d, _| d < day);
    }

    pub fn entries_for_day(&self, day: u32) -> &[DayRecord] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days in ascending order with their records
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[DayRecord])> {
        self.days.iter().map(|(&day, records)| (day, records.as_slice()))
    }

    pub fn last_day(&self) -> Option<u32> {
        self.days.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
