//! Persistence backends for [`AppState`].

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::state::AppState;

/// Somewhere the planner state can be loaded from and saved to.
pub trait TaskStore {
    fn load(&self) -> Result<AppState>;
    fn save(&mut self, state: &AppState) -> Result<()>;
}

/// Pretty-printed JSON in a single file.
///
/// Saves write a sibling temp file and rename it over the target, so a crash
/// mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    /// A missing file is an empty state, not an error.
    fn load(&self) -> Result<AppState> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no data file at {}, starting empty", self.path.display());
                return Ok(AppState::default());
            }
            Err(err) => return Err(err.into()),
        };
        let state: AppState = serde_json::from_reader(BufReader::new(file))?;
        log::debug!(
            "loaded {} members and {} tasks from {}",
            state.team_members.len(),
            state.tasks.len(),
            self.path.display()
        );
        Ok(state)
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        let dir = match self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                dir
            }
            None => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|err| err.error)?;
        log::debug!("saved state to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the state in memory; every save replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: AppState,
    saves: usize,
}

impl MemoryStore {
    pub fn new(state: AppState) -> Self {
        Self { state, saves: 0 }
    }

    /// How many times [`TaskStore::save`] has been called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Result<AppState> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        self.state = state.clone();
        self.saves += 1;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
