/// Running streak state under the one-miss forgiveness rule.
///
/// A completed day extends the streak and clears the miss counter. A missed day bumps the
/// miss counter; the streak only drops to zero once two misses happen back to back.
/// Both the live submission path and historical reconstruction fold days through this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakCounter {
    pub streak: u32,
    pub missed_days: u32,
}

impl StreakCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one day's outcome into the counter
    pub fn apply(&mut self, completed: bool) {
        if completed {
            self.streak += 1;
            self.missed_days = 0;
        } else {
            self.missed_days += 1;
            if self.missed_days > 1 {
                self.streak = 0;
            }
        }
    }

    /// Replay a sequence of outcomes from a fresh counter
    pub fn replay<I: IntoIterator<Item = bool>>(outcomes: I) -> Self {
        let mut counter = Self::new();
        for completed in outcomes {
            counter.apply(completed);
        }
        counter
    }
}
