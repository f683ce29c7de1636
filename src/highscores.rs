//! High score persistence
//!
//! Only the single best score is kept. Loading never fails: a missing or
//! corrupt record reads as 0. Saving is best effort and the session only
//! logs a failed save.

use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Errors from writing the high score
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("high score I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the best score lives between sessions
pub trait HighScoreStore {
    /// Stored best score, 0 if absent or unreadable
    fn load(&mut self) -> u64;

    /// Persist a new best score
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// On-disk record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&mut self) -> u64 {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                return 0;
            }
            Err(e) => {
                log::warn!("Failed to read high score from {}: {}", self.path.display(), e);
                return 0;
            }
        };

        match serde_json::from_str::<HighScoreRecord>(&json) {
            Ok(record) => {
                log::info!("Loaded high score {}", record.high_score);
                record.high_score
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high score file {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        // Write-then-rename so a crash never leaves a half-written record
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}

/// In-memory store. Clones share the same value, so a test can keep one
/// clone and hand the other to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    value: Rc<Cell<u64>>,
    saves: Rc<Cell<u32>>,
    failing: Rc<Cell<bool>>,
}

impl MemoryHighScoreStore {
    pub fn new(initial: u64) -> Self {
        let store = Self::default();
        store.value.set(initial);
        store
    }

    pub fn value(&self) -> u64 {
        self.value.get()
    }

    /// Number of successful saves
    pub fn saves(&self) -> u32 {
        self.saves.get()
    }

    /// Make every subsequent save fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&mut self) -> u64 {
        self.value.get()
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if self.failing.get() {
            return Err(io::Error::other("store unavailable").into());
        }
        self.value.set(score);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
