use crate::report::{SortDirection, SortField, TableQuery};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// File name of the state blob inside the data directory
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    // Table view
    #[serde(default)]
    pub sort_field: SortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

fn default_state_file() -> String {
    "state.json".to_string()
}

fn default_pretty_json() -> bool {
    true
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            pretty_json: default_pretty_json(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl TrackerSettings {
    /// Keep the table's sort column and direction
    pub fn remember_sort(&mut self, query: &TableQuery) {
        self.sort_field = query.sort_field;
        self.sort_direction = query.sort_direction;
    }
}

/// The table opens with the saved sort and an empty search
impl From<&TrackerSettings> for TableQuery {
    fn from(settings: &TrackerSettings) -> Self {
        TableQuery {
            search: String::new(),
            sort_field: settings.sort_field,
            sort_direction: settings.sort_direction,
        }
    }
}

/// Load settings from settings.json, defaults if the file doesn't exist
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<TrackerSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(TrackerSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: TrackerSettings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
    Ok(settings)
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &TrackerSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}
