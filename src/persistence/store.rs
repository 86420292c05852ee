use super::files::{atomic_write, ensure_data_dir, read_file, settings_file};
use super::settings::load_settings;
use super::state::PersistedState;
use anyhow::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Durable storage for the tracker blob
pub trait StateStore {
    /// Read the saved blob, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<PersistedState>>;

    /// Replace the saved blob
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// JSON file in the data directory, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P, pretty: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty,
        }
    }

    /// Store located through the data directory and its settings.json
    pub fn open_default() -> Result<Self> {
        let dir = ensure_data_dir()?;
        let settings = load_settings(settings_file()?)?;
        Ok(Self::new(dir.join(&settings.state_file), settings.pretty_json))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<PersistedState>> {
        match read_file(&self.path)? {
            Some(content) if !content.trim().is_empty() => {
                Ok(Some(PersistedState::from_json(&content)?))
            }
            _ => Ok(None),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let json = state.to_json(self.pretty)?;
        atomic_write(&self.path, &json)
    }
}

/// In-process store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<PersistedState>>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved blob
    pub fn with_state(state: PersistedState) -> Self {
        let store = Self::default();
        *store.slot.borrow_mut() = Some(state);
        store
    }

    /// Last blob saved
    pub fn saved(&self) -> Option<PersistedState> {
        self.slot.borrow().clone()
    }

    /// Number of saves performed
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedState>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        *self.slot.borrow_mut() = Some(state.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
