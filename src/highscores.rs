//! Best score persistence
//!
//! A single scalar survives between sessions. Backends implement
//! [`ScoreStore`]; the simulation only talks to [`BestScore`], which swallows
//! and logs every failure.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Storage backend for the best score
pub trait ScoreStore: Send + Sync {
    /// Stored best score, `None` if nothing has been saved yet
    fn read_best(&self) -> Result<Option<u32>, StoreError>;

    /// Overwrite the stored best score
    fn write_best(&self, score: u32) -> Result<(), StoreError>;
}

/// Failure-tolerant front for a [`ScoreStore`]
#[derive(Clone)]
pub struct BestScore {
    store: Arc<dyn ScoreStore>,
    // Serializes read-compare-write so concurrent sets can't lower the value
    write_lock: Arc<Mutex<()>>,
}

impl BestScore {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Best score, 0 when absent or unreadable
    pub fn get(&self) -> u32 {
        match self.store.read_best() {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                log::warn!("Failed to load best score: {}", e);
                0
            }
        }
    }

    /// Persist `candidate` if it beats the stored value.
    ///
    /// Returns true only when a new value was written.
    pub fn set(&self, candidate: u32) -> bool {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let current = self.get();
        if candidate <= current {
            return false;
        }

        match self.store.write_best(candidate) {
            Ok(()) => {
                log::info!("New best score saved: {}", candidate);
                true
            }
            Err(e) => {
                log::warn!("Failed to save best score {}: {}", candidate, e);
                false
            }
        }
    }
}

impl std::fmt::Debug for BestScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestScore").finish_non_exhaustive()
    }
}

/// In-memory store, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    best: Mutex<Option<u32>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(score: u32) -> Self {
        Self {
            best: Mutex::new(Some(score)),
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read_best(&self) -> Result<Option<u32>, StoreError> {
        Ok(*self.best.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn write_best(&self, score: u32) -> Result<(), StoreError> {
        *self.best.lock().unwrap_or_else(PoisonError::into_inner) = Some(score);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreFile {
    best_score: u32,
}

/// JSON file holding `{ "best_score": N }`
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    const FILE_NAME: &'static str = "best_score.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory, if one can be determined
    pub fn in_data_dir() -> Option<Self> {
        directories::ProjectDirs::from("", "", "flapper")
            .map(|dirs| Self::new(dirs.data_dir().join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileScoreStore {
    fn read_best(&self) -> Result<Option<u32>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: BestScoreFile = serde_json::from_str(&json)?;
        Ok(Some(file.best_score))
    }

    fn write_best(&self, score: u32) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&BestScoreFile { best_score: score })?;
        // Write-then-rename so a crash never leaves a torn file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn read_best(&self) -> Result<Option<u32>, StoreError> {
            Err(StoreError::Unavailable("disk on fire".to_string()))
        }

        fn write_best(&self, _score: u32) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk on fire".to_string()))
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("flapper-test-{}-{}", std::process::id(), name))
            .join("best_score.json")
    }

    #[test]
    fn test_empty_store_reads_zero() {
        let best = BestScore::new(Arc::new(MemoryScoreStore::new()));
        assert_eq!(best.get(), 0);
    }

    #[test]
    fn test_set_only_when_greater() {
        let best = BestScore::new(Arc::new(MemoryScoreStore::with_best(5)));
        assert!(!best.set(3));
        assert!(!best.set(5));
        assert_eq!(best.get(), 5);
        assert!(best.set(7));
        assert_eq!(best.get(), 7);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let best = BestScore::new(Arc::new(BrokenStore));
        assert_eq!(best.get(), 0);
        assert!(!best.set(10));
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = temp_path("round-trip");
        let _ = fs::remove_file(&path);
        let store = JsonFileScoreStore::new(&path);

        assert_eq!(store.read_best().expect("missing file is fine"), None);
        store.write_best(42).expect("write");
        assert_eq!(store.read_best().expect("read"), Some(42));

        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn test_corrupt_file_reads_zero() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
        fs::write(&path, "not json").expect("write");

        let store = JsonFileScoreStore::new(&path);
        assert!(matches!(store.read_best(), Err(StoreError::Corrupt(_))));
        assert_eq!(BestScore::new(Arc::new(store)).get(), 0);

        let _ = fs::remove_dir_all(path.parent().expect("has parent"));
    }

    #[test]
    fn test_concurrent_sets_keep_maximum() {
        let best = BestScore::new(Arc::new(MemoryScoreStore::new()));
        let handles: Vec<_> = (1..=16u32)
            .map(|score| {
                let best = best.clone();
                std::thread::spawn(move || best.set(score))
            })
            .collect();
        for handle in handles {
            handle.join().expect("setter thread");
        }
        assert_eq!(best.get(), 16);
    }
}
