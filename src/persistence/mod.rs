pub mod files;
pub mod settings;
pub mod state;
pub mod store;

pub use files::{
    atomic_write, ensure_data_dir, get_data_dir, init_local_dir, read_file, settings_file,
    DATA_DIR_ENV, DATA_DIR_NAME,
};
pub use settings::{load_settings, save_settings, TrackerSettings};
pub use state::PersistedState;
pub use store::{JsonFileStore, MemoryStore, StateStore};
