//! High score persistence
//!
//! A single best-survival-time scalar, stored as JSON under one key. Loads and
//! saves run as background tasks; their outcomes come back over a channel so
//! the game loop never waits on storage.

use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::error::StorageError;
use crate::persistence::{KeyValueStore, spawn_task};

/// Storage key for the high score
pub const STORAGE_KEY: &str = "airJugglerHighScore";

/// Completion of a background storage task
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceResult {
    /// Stored high score (0 when absent or unreadable)
    Loaded(u32),
    Saved(u32),
    SaveFailed { score: u32, error: StorageError },
}

/// High score load/save over a key-value store
pub struct HighScoreStore {
    store: Rc<dyn KeyValueStore>,
    tx: Sender<PersistenceResult>,
    rx: Receiver<PersistenceResult>,
}

impl HighScoreStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        let (tx, rx) = channel();
        Self {
            store: Rc::new(store),
            tx,
            rx,
        }
    }

    /// Load in the background; the result arrives via `poll`
    pub fn request_load(&self) {
        let store = Rc::clone(&self.store);
        let tx = self.tx.clone();
        spawn_task(move || {
            let score = load_from(store.as_ref());
            let _ = tx.send(PersistenceResult::Loaded(score));
        });
    }

    /// Save in the background (fire-and-forget); failures are logged
    pub fn request_save(&self, score: u32) {
        let store = Rc::clone(&self.store);
        let tx = self.tx.clone();
        spawn_task(move || {
            let result = match save_to(store.as_ref(), score) {
                Ok(()) => {
                    log::info!("High score saved: {}", score);
                    PersistenceResult::Saved(score)
                }
                Err(error) => {
                    log::error!("Error saving high score: {}", error);
                    PersistenceResult::SaveFailed { score, error }
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Drain completed storage tasks without blocking
    pub fn poll(&self) -> Vec<PersistenceResult> {
        self.rx.try_iter().collect()
    }
}

/// Read the stored high score, falling back to 0 on any failure
fn load_from(store: &dyn KeyValueStore) -> u32 {
    match store.get(STORAGE_KEY).and_then(|raw| raw.map(decode).transpose()) {
        Ok(Some(score)) => {
            log::info!("Loaded high score: {}", score);
            score
        }
        Ok(None) => {
            log::info!("No high score found, starting fresh");
            0
        }
        Err(e) => {
            log::warn!("Could not load high score ({}), starting fresh", e);
            0
        }
    }
}

fn save_to(store: &dyn KeyValueStore, score: u32) -> Result<(), StorageError> {
    let value = serde_json::to_string(&score).map_err(|e| StorageError::Write {
        key: STORAGE_KEY.to_string(),
        reason: e.to_string(),
    })?;
    store.set(STORAGE_KEY, &value)
}

fn decode(raw: String) -> Result<u32, StorageError> {
    serde_json::from_str(raw.trim()).map_err(|e| StorageError::Parse {
        key: STORAGE_KEY.to_string(),
        reason: e.to_string(),
    })
}
