use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory name used both per project and under the home directory
pub const DATA_DIR_NAME: &str = ".habitrack";

/// Overrides every other lookup when set
pub const DATA_DIR_ENV: &str = "HABITRACK_DIR";

/// Resolve where tracker files live.
///
/// Lookup order: `$HABITRACK_DIR`, the closest `.habitrack` at or above the working
/// directory, `~/.habitrack`. Nothing is created here.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    let cwd = env::current_dir().context("Could not determine current directory")?;
    if let Some(dir) = find_local_dir(&cwd) {
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .context("Could not determine home directory")
}

fn find_local_dir(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// `get_data_dir`, creating the directory on first use
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = get_data_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    Ok(dir)
}

/// Create `<parent>/.habitrack` so later lookups from inside `parent` pick it up.
/// Errors if one is already there.
pub fn init_local_dir<P: AsRef<Path>>(parent: P) -> Result<PathBuf> {
    let dir = parent.as_ref().join(DATA_DIR_NAME);
    if dir.exists() {
        anyhow::bail!("Data directory already exists: {}", dir.display());
    }
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    Ok(dir)
}

pub fn settings_file() -> Result<PathBuf> {
    Ok(ensure_data_dir()?.join("settings.json"))
}

/// Replace `path` with `content` in one step.
///
/// The bytes go to a synced temp file in the same directory, which is then renamed over the
/// target, so readers see either the old file or the new one.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .with_context(|| format!("No parent directory for {}", path.display()))?;

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to stage write in {}", dir.display()))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|_| staged.as_file().sync_all())
        .context("Failed to write staged file")?;
    staged
        .persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// File contents, `None` when the file is absent
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}
