use crate::domain::{display_order, DayHistoryLog, Habit, HabitId, TrackerResult};
use crate::engine::{completion_percent, SubmissionSummary, TrackerState};
use crate::persistence::{
    load_settings, save_settings, settings_file, JsonFileStore, MemoryStore, PersistedState,
    StateStore, TrackerSettings,
};
use crate::report::{build_table, HabitTable, SortField, TableQuery};
use crate::undo::UndoRedoManager;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// settings.json the table sort is written back to
struct SettingsFile {
    path: PathBuf,
    settings: TrackerSettings,
}

/// The tracker controller.
///
/// Owns the live state, the undo/redo stacks and the storage backend. Every mutating call
/// either fails without touching anything or applies fully and then saves.
pub struct Tracker {
    state: TrackerState,
    history: UndoRedoManager,
    /// Percentage frozen by the last submission, shown until a mark changes
    frozen_percent: Option<u8>,
    store: Box<dyn StateStore>,
    memory_only: bool,
    query: TableQuery,
    settings: Option<SettingsFile>,
}

impl Tracker {
    /// Load once from `store`; an unreadable store leaves the tracker memory-only
    pub fn new(store: Box<dyn StateStore>) -> Self {
        let (state, history, memory_only) = match store.load() {
            Ok(Some(blob)) => {
                let (state, history) = blob.into_parts();
                (state, history, false)
            }
            Ok(None) => (TrackerState::default(), UndoRedoManager::default(), false),
            Err(err) => {
                warn!(error = %err, "failed to load tracker state, continuing in memory");
                (TrackerState::default(), UndoRedoManager::default(), true)
            }
        };

        debug!(
            day = state.current_day,
            habits = state.habits.len(),
            undo_depth = history.undo_stack().len(),
            "tracker loaded"
        );

        Self {
            state,
            history,
            frozen_percent: None,
            store,
            memory_only,
            query: TableQuery::default(),
            settings: None,
        }
    }

    /// Like `new`, with the table sort read from and written back to `settings_path`
    pub fn with_settings<P: AsRef<Path>>(store: Box<dyn StateStore>, settings_path: P) -> Self {
        let path = settings_path.as_ref().to_path_buf();
        let settings = load_settings(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "unreadable settings, using defaults");
            TrackerSettings::default()
        });

        let mut tracker = Self::new(store);
        tracker.query = TableQuery::from(&settings);
        tracker.settings = Some(SettingsFile { path, settings });
        tracker
    }

    /// Tracker backed by the JSON file in the resolved data directory
    pub fn open_default() -> Self {
        let opened = JsonFileStore::open_default().and_then(|store| Ok((store, settings_file()?)));
        match opened {
            Ok((store, settings_path)) => Self::with_settings(Box::new(store), settings_path),
            Err(err) => {
                warn!(error = %err, "data directory unavailable, continuing in memory");
                let mut tracker = Self::new(Box::new(MemoryStore::new()));
                tracker.memory_only = true;
                tracker
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    fn save(&mut self) {
        if self.memory_only {
            return;
        }
        let blob = PersistedState::capture(&self.state, &self.history);
        if let Err(err) = self.store.save(&blob) {
            warn!(error = %err, "failed to save tracker state, continuing in memory");
            self.memory_only = true;
        }
    }

    fn save_sort(&mut self) {
        let Some(file) = self.settings.as_mut() else {
            return;
        };
        file.settings.remember_sort(&self.query);
        if let Err(err) = save_settings(&file.path, &file.settings) {
            warn!(path = %file.path.display(), error = %err, "failed to save table sort");
        }
    }

    // Reads

    pub fn current_day(&self) -> u32 {
        self.state.current_day
    }

    pub fn habits(&self) -> &[Habit] {
        self.state.habits.as_slice()
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.state.habits.get(id)
    }

    /// Habits in checklist order
    pub fn habits_for_display(&self) -> Vec<&Habit> {
        display_order(self.habits(), self.state.current_day)
    }

    pub fn day_history(&self) -> &DayHistoryLog {
        &self.state.day_history
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn undo_manager(&self) -> &UndoRedoManager {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// True once storage failed and saves are skipped
    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    /// Percentage for the day being marked: frozen after a submission, live otherwise
    pub fn today_completion_percent(&self) -> u8 {
        if self.state.habits.is_empty() {
            return 0;
        }
        self.frozen_percent.unwrap_or_else(|| {
            completion_percent(self.state.habits.completed_count(), self.state.habits.len())
        })
    }

    // Table view

    pub fn table_query(&self) -> &TableQuery {
        &self.query
    }

    /// Rows for the table view under the current search and sort
    pub fn habit_table(&self) -> HabitTable {
        build_table(self.habits(), self.state.current_day, &self.query)
    }

    pub fn set_table_search(&mut self, search: &str) {
        self.query.search = search.to_string();
    }

    /// Header click; the resulting sort is remembered in settings.json
    pub fn sort_table_by(&mut self, field: SortField) {
        self.query.sort_by(field);
        self.save_sort();
    }

    pub fn reset_table_query(&mut self) {
        self.query.reset();
        self.save_sort();
    }

    // Habit management

    pub fn add_habit(&mut self, name: &str) -> TrackerResult<Habit> {
        let habit = self.state.habits.add(name, self.state.current_day)?.clone();
        info!(habit_id = %habit.id, name = %habit.name, day = habit.start_day, "habit added");
        self.save();
        Ok(habit)
    }

    pub fn rename_habit(&mut self, id: HabitId, new_name: &str) -> TrackerResult<()> {
        self.state.habits.rename(id, new_name)?;
        info!(habit_id = %id, name = %new_name.trim(), "habit renamed");
        self.save();
        Ok(())
    }

    /// Remove a habit and its history. Not recorded on the undo stack.
    pub fn delete_habit(&mut self, id: HabitId) -> TrackerResult<Habit> {
        let removed = self.state.habits.delete(id)?;
        info!(habit_id = %id, name = %removed.name, "habit deleted");
        self.save();
        Ok(removed)
    }

    pub fn set_completed(&mut self, id: HabitId, completed: bool) -> TrackerResult<()> {
        self.state.habits.set_completed(id, completed)?;
        self.frozen_percent = None;
        self.save();
        Ok(())
    }

    pub fn toggle_completed(&mut self, id: HabitId) -> TrackerResult<bool> {
        let completed = self.state.habits.toggle_completed(id)?;
        self.frozen_percent = None;
        self.save();
        Ok(completed)
    }

    pub fn select_all(&mut self) {
        self.state.habits.select_all();
        self.frozen_percent = None;
        self.save();
    }

    pub fn deselect_all(&mut self) {
        self.state.habits.deselect_all();
        self.frozen_percent = None;
        self.save();
    }

    // Day submission

    pub fn submit_day(&mut self) -> SubmissionSummary {
        let summary = self.state.submit_day(&mut self.history);
        self.frozen_percent = Some(summary.percent);
        info!(day = summary.day, percent = summary.percent, "day closed");
        self.save();
        summary
    }

    pub fn undo(&mut self) -> TrackerResult<()> {
        self.state.undo(&mut self.history)?;
        info!(day = self.state.current_day, "rewound to day");
        self.save();
        Ok(())
    }

    pub fn redo(&mut self) -> TrackerResult<()> {
        self.state.redo(&mut self.history)?;
        info!(day = self.state.current_day, "advanced to day");
        self.save();
        Ok(())
    }

    /// Erase all habits, history and undo/redo stacks
    pub fn restart(&mut self) {
        self.state = TrackerState::default();
        self.history.clear();
        self.frozen_percent = None;
        info!("tracker restarted");
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrackerError;
    use crate::report::SortDirection;
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn create_test_tracker() -> (Tracker, MemoryStore) {
        let store = MemoryStore::new();
        let tracker = Tracker::new(Box::new(store.clone()));
        (tracker, store)
    }

    /// Store that fails every call after `ok_saves` successful saves
    struct FlakyStore {
        ok_saves: usize,
        attempts: Rc<Cell<usize>>,
    }

    impl StateStore for FlakyStore {
        fn load(&self) -> Result<Option<PersistedState>> {
            Ok(None)
        }

        fn save(&self, _state: &PersistedState) -> Result<()> {
            self.attempts.set(self.attempts.get() + 1);
            if self.attempts.get() > self.ok_saves {
                anyhow::bail!("storage unavailable");
            }
            Ok(())
        }
    }

    struct BrokenLoadStore;

    impl StateStore for BrokenLoadStore {
        fn load(&self) -> Result<Option<PersistedState>> {
            anyhow::bail!("corrupt")
        }

        fn save(&self, _state: &PersistedState) -> Result<()> {
            panic!("memory-only tracker must not save");
        }
    }

    #[test]
    fn test_tracker_new() {
        let (tracker, store) = create_test_tracker();
        assert_eq!(tracker.current_day(), 1);
        assert!(tracker.habits().is_empty());
        assert!(!tracker.can_undo());
        assert!(!tracker.is_memory_only());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_add_habit_saves() {
        let (mut tracker, store) = create_test_tracker();
        let habit = tracker.add_habit("Run").unwrap();

        assert_eq!(habit.start_day, 1);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.saved().unwrap().habits.len(), 1);
    }

    #[test]
    fn test_duplicate_name_does_not_mutate_or_save() {
        let (mut tracker, store) = create_test_tracker();
        tracker.add_habit("Run").unwrap();

        let err = tracker.add_habit("run").unwrap_err();
        assert_eq!(err, TrackerError::DuplicateName("run".to_string()));
        assert_eq!(tracker.habits().len(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_habit_added_later_starts_on_current_day() {
        let (mut tracker, _) = create_test_tracker();
        tracker.submit_day();
        tracker.submit_day();

        let habit = tracker.add_habit("Meditate").unwrap();
        assert_eq!(habit.start_day, 3);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let (mut tracker, _) = create_test_tracker();
        let id = HabitId::new();

        assert_eq!(tracker.set_completed(id, true).unwrap_err(), TrackerError::NotFound(id));
        assert_eq!(tracker.toggle_completed(id).unwrap_err(), TrackerError::NotFound(id));
        assert_eq!(tracker.rename_habit(id, "x").unwrap_err(), TrackerError::NotFound(id));

        tracker.add_habit("Run").unwrap();
        assert_eq!(tracker.rename_habit(id, "run").unwrap_err(), TrackerError::NotFound(id));
        assert_eq!(tracker.delete_habit(id).unwrap_err(), TrackerError::NotFound(id));
    }

    #[test]
    fn test_frozen_percentage() {
        let (mut tracker, _) = create_test_tracker();
        assert_eq!(tracker.today_completion_percent(), 0);

        let run = tracker.add_habit("Run").unwrap().id;
        tracker.add_habit("Read").unwrap();
        tracker.add_habit("Write").unwrap();

        tracker.set_completed(run, true).unwrap();
        assert_eq!(tracker.today_completion_percent(), 33);

        let summary = tracker.submit_day();
        assert_eq!(summary.percent, 33);
        // Marks were cleared, the frozen value is still shown
        assert_eq!(tracker.today_completion_percent(), 33);

        tracker.toggle_completed(run).unwrap();
        assert_eq!(tracker.today_completion_percent(), 33);
        tracker.select_all();
        assert_eq!(tracker.today_completion_percent(), 100);
        tracker.deselect_all();
        assert_eq!(tracker.today_completion_percent(), 0);
    }

    #[test]
    fn test_frozen_percentage_survives_undo_and_redo() {
        let (mut tracker, _) = create_test_tracker();
        let run = tracker.add_habit("Run").unwrap().id;
        tracker.add_habit("Read").unwrap();
        tracker.add_habit("Write").unwrap();
        tracker.set_completed(run, true).unwrap();

        tracker.submit_day();
        assert_eq!(tracker.today_completion_percent(), 33);

        tracker.undo().unwrap();
        assert_eq!(tracker.today_completion_percent(), 33);

        // Redo brings back the cleared marks, the frozen value still wins
        tracker.redo().unwrap();
        assert_eq!(tracker.habits().iter().filter(|h| h.completed).count(), 0);
        assert_eq!(tracker.today_completion_percent(), 33);

        tracker.toggle_completed(run).unwrap();
        assert_eq!(tracker.today_completion_percent(), 33);
        tracker.toggle_completed(run).unwrap();
        assert_eq!(tracker.today_completion_percent(), 0);
    }

    #[test]
    fn test_submit_with_zero_habits() {
        let (mut tracker, store) = create_test_tracker();
        let summary = tracker.submit_day();

        assert_eq!(summary.percent, 0);
        assert_eq!(tracker.current_day(), 2);
        assert_eq!(tracker.today_completion_percent(), 0);
        assert_eq!(store.saved().unwrap().current_day, 2);
    }

    #[test]
    fn test_undo_redo_through_tracker() {
        let (mut tracker, store) = create_test_tracker();
        let run = tracker.add_habit("Run").unwrap().id;
        tracker.set_completed(run, true).unwrap();
        tracker.submit_day();
        let after_first = tracker.state().clone();

        tracker.set_completed(run, true).unwrap();
        tracker.submit_day();
        let after_second = tracker.state().clone();
        assert_eq!(tracker.habit(run).unwrap().streak, 2);

        tracker.undo().unwrap();
        assert_eq!(tracker.current_day(), 2);
        assert!(tracker.habit(run).unwrap().completed);
        assert_eq!(tracker.habit(run).unwrap().streak, 1);
        assert_eq!(tracker.habit(run).unwrap().history, after_first.habits.get(run).unwrap().history);

        tracker.redo().unwrap();
        assert_eq!(tracker.state(), &after_second);
        assert_eq!(store.saved().unwrap().current_day, 3);
    }

    #[test]
    fn test_empty_undo_and_redo() {
        let (mut tracker, store) = create_test_tracker();
        assert_eq!(tracker.undo().unwrap_err(), TrackerError::NothingToUndo);
        assert_eq!(tracker.redo().unwrap_err(), TrackerError::NothingToRedo);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_redo_invalidated_by_new_submission() {
        let (mut tracker, _) = create_test_tracker();
        tracker.add_habit("Run").unwrap();
        tracker.submit_day();
        tracker.undo().unwrap();
        assert!(tracker.can_redo());

        tracker.submit_day();
        assert!(!tracker.can_redo());
        assert!(tracker.redo().unwrap_err().is_empty_stack());
    }

    #[test]
    fn test_delete_is_outside_undo() {
        let (mut tracker, _) = create_test_tracker();
        let run = tracker.add_habit("Run").unwrap().id;
        tracker.add_habit("Read").unwrap();
        tracker.submit_day();

        let undo_depth = tracker.undo_manager().undo_stack().len();
        tracker.delete_habit(run).unwrap();
        assert_eq!(tracker.undo_manager().undo_stack().len(), undo_depth);
        assert!(tracker.habit(run).is_none());

        // The day log keeps what was recorded while the habit existed
        assert_eq!(tracker.day_history().entries_for_day(1).len(), 2);

        // Undo restores the whole pre-submission snapshot, which still had the habit
        tracker.undo().unwrap();
        assert!(tracker.habit(run).is_some());
    }

    #[test]
    fn test_restart() {
        let (mut tracker, store) = create_test_tracker();
        tracker.add_habit("Run").unwrap();
        tracker.submit_day();

        tracker.restart();
        assert_eq!(tracker.current_day(), 1);
        assert!(tracker.habits().is_empty());
        assert!(tracker.day_history().is_empty());
        assert!(!tracker.can_undo());
        assert_eq!(store.saved().unwrap(), PersistedState::default());
    }

    #[test]
    fn test_reload_from_store() {
        let (mut tracker, store) = create_test_tracker();
        let run = tracker.add_habit("Run").unwrap().id;
        tracker.add_habit("Read").unwrap();
        tracker.set_completed(run, true).unwrap();
        tracker.submit_day();
        tracker.submit_day();
        tracker.undo().unwrap();

        let reloaded = Tracker::new(Box::new(store.clone()));
        assert_eq!(reloaded.state(), tracker.state());
        assert_eq!(reloaded.undo_manager(), tracker.undo_manager());
    }

    #[test]
    fn test_loads_previously_saved_state() {
        let (mut first, _) = create_test_tracker();
        first.add_habit("Run").unwrap();
        first.submit_day();
        let blob = PersistedState::capture(first.state(), first.undo_manager());

        let store = MemoryStore::with_state(blob);
        let tracker = Tracker::new(Box::new(store.clone()));
        assert_eq!(tracker.current_day(), 2);
        assert_eq!(tracker.habits()[0].name, "Run");
        assert!(tracker.can_undo());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_json_file_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("state.json");

        let mut tracker = Tracker::new(Box::new(JsonFileStore::new(&path, true)));
        let run = tracker.add_habit("Run").unwrap().id;
        tracker.set_completed(run, true).unwrap();
        tracker.submit_day();
        tracker.submit_day();
        tracker.undo().unwrap();

        let reloaded = Tracker::new(Box::new(JsonFileStore::new(&path, true)));
        assert_eq!(reloaded.state(), tracker.state());
        assert_eq!(reloaded.undo_manager(), tracker.undo_manager());
        assert!(reloaded.can_redo());
    }

    #[test]
    fn test_save_failure_degrades_to_memory() {
        let attempts = Rc::new(Cell::new(0));
        let mut tracker = Tracker::new(Box::new(FlakyStore {
            ok_saves: 1,
            attempts: attempts.clone(),
        }));

        let run = tracker.add_habit("Run").unwrap().id;
        assert!(!tracker.is_memory_only());

        tracker.set_completed(run, true).unwrap();
        assert!(tracker.is_memory_only());

        // Still fully functional, but no more save attempts
        tracker.submit_day();
        assert_eq!(tracker.habit(run).unwrap().streak, 1);
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_load_failure_degrades_to_memory() {
        let mut tracker = Tracker::new(Box::new(BrokenLoadStore));
        assert!(tracker.is_memory_only());

        tracker.add_habit("Run").unwrap();
        tracker.submit_day();
        assert_eq!(tracker.current_day(), 2);
    }

    #[test]
    fn test_table_sort_is_remembered() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let mut tracker = Tracker::with_settings(Box::new(MemoryStore::new()), &settings_path);
        assert_eq!(tracker.table_query(), &TableQuery::default());

        let run = tracker.add_habit("Run").unwrap().id;
        tracker.add_habit("Bike").unwrap();
        tracker.set_completed(run, true).unwrap();
        tracker.submit_day();

        tracker.sort_table_by(SortField::Streak);
        tracker.sort_table_by(SortField::Streak);
        tracker.set_table_search("u");
        let names: Vec<String> = tracker.habit_table().rows.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Run".to_string()]);

        let saved = load_settings(&settings_path).unwrap();
        assert_eq!(saved.sort_field, SortField::Streak);
        assert_eq!(saved.sort_direction, SortDirection::Desc);

        // Sort comes back on reopen, the search does not
        let reopened = Tracker::with_settings(Box::new(MemoryStore::new()), &settings_path);
        assert_eq!(reopened.table_query().sort_field, SortField::Streak);
        assert_eq!(reopened.table_query().sort_direction, SortDirection::Desc);
        assert!(reopened.table_query().search.is_empty());

        tracker.reset_table_query();
        assert_eq!(load_settings(&settings_path).unwrap().sort_field, SortField::Name);
    }

    #[test]
    fn test_in_memory_tracker_sorts_without_settings() {
        let mut tracker = Tracker::in_memory();
        tracker.add_habit("b").unwrap();
        tracker.add_habit("a").unwrap();

        tracker.sort_table_by(SortField::Name);
        let names: Vec<String> = tracker.habit_table().rows.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_habits_for_display() {
        let (mut tracker, _) = create_test_tracker();
        let walk = tracker.add_habit("walk").unwrap().id;
        let zen = tracker.add_habit("Zen").unwrap().id;
        tracker.set_completed(walk, true).unwrap();
        tracker.set_completed(zen, true).unwrap();
        tracker.submit_day();
        tracker.set_completed(walk, true).unwrap();
        tracker.submit_day();

        let names: Vec<&str> = tracker
            .habits_for_display()
            .into_iter()
            .map(|h| h.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zen", "walk"]);
    }
}
