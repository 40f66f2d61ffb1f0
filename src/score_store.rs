//! Persistence for the session-spanning high score.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy_ecs::resource::Resource;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Somewhere the best score can survive between sessions.
pub trait HighScoreStore: Send + Sync {
    /// The stored high score, or 0 when nothing has been stored yet.
    fn load(&self) -> Result<u32, StoreError>;

    /// Stores `candidate` if, and only if, it beats the stored value.
    fn save(&mut self, candidate: u32) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Keeps the high score in a small JSON file.
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

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&contents)?;
        Ok(record.high_score)
    }

    fn save(&mut self, candidate: u32) -> Result<(), StoreError> {
        // An unreadable file is overwritten rather than blocking every future save.
        let stored = self.load().unwrap_or(0);
        if candidate <= stored {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: candidate })?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), high_score = candidate, "High score written");
        Ok(())
    }
}

/// An in-memory store. Clones share the same value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: Arc<Mutex<u32>>,
}

impl MemoryStore {
    pub fn new(initial: u32) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn get(&self) -> u32 {
        *self.value.lock()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.get())
    }

    fn save(&mut self, candidate: u32) -> Result<(), StoreError> {
        let mut value = self.value.lock();
        *value = (*value).max(candidate);
        Ok(())
    }
}

/// The best score seen so far, backed by a store on a best-effort basis.
///
/// Store failures never reach the simulation: a failed load starts from 0 and a
/// failed save is dropped, both with a warning.
#[derive(Resource)]
pub struct HighScore {
    best: u32,
    store: Box<dyn HighScoreStore>,
}

impl HighScore {
    pub fn new(store: impl HighScoreStore + 'static) -> Self {
        let best = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load high score, starting from 0");
            0
        });
        Self {
            best,
            store: Box::new(store),
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Records `score` if it beats the current best.
    pub fn submit(&mut self, score: u32) {
        if score <= self.best {
            return;
        }
        self.best = score;
        if let Err(e) = self.store.save(score) {
            warn!(error = %e, score, "Failed to save high score");
        }
    }
}

impl Default for HighScore {
    fn default() -> Self {
        Self::new(MemoryStore::default())
    }
}
