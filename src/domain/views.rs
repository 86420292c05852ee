use super::habit::Habit;
use std::cmp::Ordering;

/// Whether the habit was missed on the last submitted day while its streak survives.
///
/// A habit in this state resets on the next miss, so the list surfaces it first.
pub fn needs_attention(habit: &Habit, current_day: u32) -> bool {
    if current_day <= 1 || habit.streak == 0 {
        return false;
    }
    habit.outcome(current_day - 1) == Some(false)
}

/// Habits ordered for the daily checklist: attention-needed first, then by name
pub fn display_order(habits: &[Habit], current_day: u32) -> Vec<&Habit> {
    let mut ordered: Vec<&Habit> = habits.iter().collect();
    ordered.sort_by(|a, b| {
        let a_flag = needs_attention(a, current_day);
        let b_flag = needs_attention(b, current_day);
        match (a_flag, b_flag) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    });
    ordered
}
