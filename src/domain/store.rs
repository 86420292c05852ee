use super::error::{TrackerError, TrackerResult};
use super::habit::{Habit, HabitId};
use serde::{Deserialize, Serialize};

/// The set of habits in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a habit starting on `current_day`
    pub fn add(&mut self, name: &str, current_day: u32) -> TrackerResult<&Habit> {
        let name = validate_name(name)?;
        if self.find_by_name(name).is_some() {
            return Err(TrackerError::DuplicateName(name.to_string()));
        }

        self.habits.push(Habit::new(name.to_string(), current_day));
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Rename in place; a different habit already using the name is a duplicate
    pub fn rename(&mut self, id: HabitId, new_name: &str) -> TrackerResult<()> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or(TrackerError::NotFound(id))?;
        let new_name = validate_name(new_name)?;
        if self.habits.iter().any(|h| h.id != id && h.matches_name(new_name)) {
            return Err(TrackerError::DuplicateName(new_name.to_string()));
        }

        self.habits[index].name = new_name.to_string();
        Ok(())
    }

    /// Remove a habit along with its history
    pub fn delete(&mut self, id: HabitId) -> TrackerResult<Habit> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or(TrackerError::NotFound(id))?;
        Ok(self.habits.remove(index))
    }

    pub fn set_completed(&mut self, id: HabitId, completed: bool) -> TrackerResult<()> {
        let habit = self.get_mut(id).ok_or(TrackerError::NotFound(id))?;
        habit.completed = completed;
        Ok(())
    }

    /// Flip the completion mark, returning the new value
    pub fn toggle_completed(&mut self, id: HabitId) -> TrackerResult<bool> {
        let habit = self.get_mut(id).ok_or(TrackerError::NotFound(id))?;
        habit.completed = !habit.completed;
        Ok(habit.completed)
    }

    pub fn select_all(&mut self) {
        self.set_all(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_all(false);
    }

    fn set_all(&mut self, completed: bool) {
        for habit in &mut self.habits {
            habit.completed = completed;
        }
    }

    pub fn get(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: HabitId) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.matches_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Habit> {
        self.habits.iter_mut()
    }

    pub fn as_slice(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Number of habits checked for the current day
    pub fn completed_count(&self) -> usize {
        self.habits.iter().filter(|h| h.completed).count()
    }
}

fn validate_name(name: &str) -> TrackerResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::EmptyName);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(names: &[&str]) -> HabitStore {
        let mut store = HabitStore::new();
        for name in names {
            store.add(name, 1).unwrap();
        }
        store
    }

    #[test]
    fn test_add_habit() {
        let mut store = HabitStore::new();
        let habit = store.add("Run", 4).unwrap();
        assert_eq!(habit.name, "Run");
        assert_eq!(habit.start_day, 4);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_trims_name() {
        let mut store = HabitStore::new();
        let habit = store.add("  Read  ", 1).unwrap();
        assert_eq!(habit.name, "Read");
    }

    #[test]
    fn test_add_duplicate_case_insensitive() {
        let mut store = store_with(&["Run"]);
        let err = store.add("run", 1).unwrap_err();
        assert_eq!(err, TrackerError::DuplicateName("run".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_empty_name() {
        let mut store = HabitStore::new();
        assert_eq!(store.add("   ", 1).unwrap_err(), TrackerError::EmptyName);
        assert!(store.is_empty());
    }

    #[test]
    fn test_rename() {
        let mut store = store_with(&["Run", "Read"]);
        let id = store.find_by_name("Run").unwrap().id;

        store.rename(id, "Jog").unwrap();
        assert_eq!(store.get(id).unwrap().name, "Jog");
    }

    #[test]
    fn test_rename_to_own_name_with_new_case() {
        let mut store = store_with(&["Run"]);
        let id = store.find_by_name("Run").unwrap().id;

        store.rename(id, "RUN").unwrap();
        assert_eq!(store.get(id).unwrap().name, "RUN");
    }

    #[test]
    fn test_rename_collision() {
        let mut store = store_with(&["Run", "Read"]);
        let id = store.find_by_name("Run").unwrap().id;

        let err = store.rename(id, "read").unwrap_err();
        assert_eq!(err, TrackerError::DuplicateName("read".to_string()));
        assert_eq!(store.get(id).unwrap().name, "Run");
    }

    #[test]
    fn test_rename_unknown_id() {
        let mut store = store_with(&["Run"]);
        let missing = HabitId::new();
        assert_eq!(store.rename(missing, "Walk").unwrap_err(), TrackerError::NotFound(missing));
        // Unknown id wins over a clashing or blank name
        assert_eq!(store.rename(missing, "run").unwrap_err(), TrackerError::NotFound(missing));
        assert_eq!(store.rename(missing, "  ").unwrap_err(), TrackerError::NotFound(missing));
    }

    #[test]
    fn test_delete() {
        let mut store = store_with(&["Run", "Read"]);
        let id = store.find_by_name("Run").unwrap().id;

        let removed = store.delete(id).unwrap();
        assert_eq!(removed.name, "Run");
        assert_eq!(store.len(), 1);
        assert!(store.get(id).is_none());
        assert_eq!(store.delete(id).unwrap_err(), TrackerError::NotFound(id));
    }

    #[test]
    fn test_completion_flags() {
        let mut store = store_with(&["Run", "Read", "Write"]);
        let id = store.find_by_name("Read").unwrap().id;

        store.set_completed(id, true).unwrap();
        assert_eq!(store.completed_count(), 1);

        assert!(!store.toggle_completed(id).unwrap());
        assert_eq!(store.completed_count(), 0);

        store.select_all();
        assert_eq!(store.completed_count(), 3);

        store.deselect_all();
        assert_eq!(store.completed_count(), 0);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let store = store_with(&["Zebra", "Apple", "Mango"]);
        let names: Vec<&str> = store.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Apple", "Mango"]);
    }
}
