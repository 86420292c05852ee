use crate::app::Tracker;
use crate::metrics::{average_completion_rate, average_streak_at};
use crate::persistence::atomic_write;
use crate::report::table::{build_table, TableQuery};
use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Format a fraction as a percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Render the tracker as a markdown report
pub fn generate_report(tracker: &Tracker, query: &TableQuery) -> String {
    let habits = tracker.habits();
    let current_day = tracker.current_day();
    let last_day = current_day.saturating_sub(1);
    let mut report = String::new();

    // Header
    report.push_str(&format!("# Habit Report - Day {}\n\n", current_day));
    report.push_str(&format!(
        "_Generated {}_\n\n",
        Local::now().format("%Y-%m-%d %H:%M")
    ));

    // Summary
    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Days Submitted:** {}\n", last_day));
    report.push_str(&format!("- **Habits:** {}\n", habits.len()));
    report.push_str(&format!(
        "- **Completed Today:** {}%\n",
        tracker.today_completion_percent()
    ));
    if let Some(avg) = average_streak_at(habits, last_day) {
        report.push_str(&format!("- **Average Streak:** {:.1}\n", avg));
    }
    match average_completion_rate(habits, current_day) {
        Some(rate) => report.push_str(&format!("- **Average Completion:** {}\n", format_percent(rate))),
        None => report.push_str("- **Average Completion:** N/A\n"),
    }
    report.push('\n');

    // Table
    let table = build_table(habits, current_day, query);
    report.push_str("## Habits\n\n");
    report.push_str("| Habit | Streak | Completion | Last Completed |\n");
    report.push_str("|-------|--------|------------|----------------|\n");
    for row in &table.rows {
        report.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            row.name,
            row.streak,
            row.completion_label(),
            row.last_completed.label()
        ));
    }
    report.push_str(&format!(
        "| **Average** | {} | {} | {} |\n\n",
        table.average.streak,
        table.average.completion_label(),
        table.average.last_completed_label()
    ));

    // Day log
    let log = tracker.day_history();
    if !log.is_empty() {
        report.push_str("## Day Log\n\n");
        for (day, records) in log.iter() {
            let done = records.iter().filter(|r| r.completed).count();
            let names: Vec<String> = records
                .iter()
                .filter(|r| r.completed)
                .map(|r| match tracker.habit(r.habit_id) {
                    Some(habit) => habit.name.clone(),
                    None => "(deleted)".to_string(),
                })
                .collect();
            report.push_str(&format!("- Day {}: {}/{}", day, done, records.len()));
            if !names.is_empty() {
                report.push_str(&format!(" ({})", names.join(", ")));
            }
            report.push('\n');
        }
    }

    report
}

/// Write the report to `path`
pub fn write_report<P: AsRef<Path>>(tracker: &Tracker, query: &TableQuery, path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    atomic_write(path, &generate_report(tracker, query))?;
    Ok(path.to_path_buf())
}
