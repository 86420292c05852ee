//! Read-only computations over habits and their history.
//!
//! Everything here is derived from `Habit::history` and `start_day`; none of it reads the
//! cached streak fields, which lets tests compare the two.

use crate::domain::{Habit, StreakCounter};

/// Completed days in `start_day..current_day`
pub fn completed_days_since(habit: &Habit, current_day: u32) -> u32 {
    if current_day <= habit.start_day {
        return 0;
    }
    habit
        .history
        .range(habit.start_day..current_day)
        .filter(|(_, &done)| done)
        .count() as u32
}

/// Fraction of submitted days completed since the habit was created, `None` before any
/// day has been submitted for it
pub fn completion_rate(habit: &Habit, current_day: u32) -> Option<f64> {
    let days = habit.days_tracked(current_day);
    if days == 0 {
        return None;
    }
    Some(completed_days_since(habit, current_day) as f64 / days as f64)
}

/// Streak value as it stood at the end of `day`
pub fn streak_at(habit: &Habit, day: u32) -> Option<u32> {
    if day < habit.start_day {
        return None;
    }
    Some(habit.replay_until(day).streak)
}

/// Streak at the end of each day `1..=upto_day`; `None` for days before the habit existed
pub fn streak_series(habit: &Habit, upto_day: u32) -> Vec<Option<u32>> {
    let mut counter = StreakCounter::new();
    (1..=upto_day)
        .map(|day| {
            if day < habit.start_day {
                return None;
            }
            if let Some(done) = habit.outcome(day) {
                counter.apply(done);
            }
            Some(counter.streak)
        })
        .collect()
}

/// Days between `upto_day` and the latest miss at or before it, or since the start day
/// when the habit was never missed
pub fn days_since_last_failure(habit: &Habit, upto_day: u32) -> Option<u32> {
    if upto_day < habit.start_day {
        return None;
    }
    let last_miss = habit
        .history
        .range(habit.start_day..=upto_day)
        .rev()
        .find(|(_, &done)| !done)
        .map(|(&day, _)| day);
    Some(upto_day - last_miss.unwrap_or(habit.start_day))
}

fn average<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Mean streak at `day` across habits that had started by then
pub fn average_streak_at(habits: &[Habit], day: u32) -> Option<f64> {
    average(habits.iter().filter_map(|h| streak_at(h, day)).map(f64::from))
}

/// Average streak for each day `1..=upto_day`
pub fn average_streak_series(habits: &[Habit], upto_day: u32) -> Vec<Option<f64>> {
    let series: Vec<Vec<Option<u32>>> = habits.iter().map(|h| streak_series(h, upto_day)).collect();
    (0..upto_day as usize)
        .map(|i| average(series.iter().filter_map(|s| s[i]).map(f64::from)))
        .collect()
}

/// Mean days-since-failure at `day` across started habits
pub fn average_days_since_failure(habits: &[Habit], day: u32) -> Option<f64> {
    average(
        habits
            .iter()
            .filter_map(|h| days_since_last_failure(h, day))
            .map(f64::from),
    )
}

/// Mean completion rate over habits with at least one submitted day
pub fn average_completion_rate(habits: &[Habit], current_day: u32) -> Option<f64> {
    average(habits.iter().filter_map(|h| completion_rate(h, current_day)))
}
