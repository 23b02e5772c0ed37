use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from checkpoint persistence
///
/// Unlike loading (which degrades gracefully), a failed save is fatal to
/// the run: continuing without durable progress would break the resume
/// contract.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable record of work completed across runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// URLs of targets that finished successfully
    pub completed: BTreeSet<String>,

    /// URLs of targets that aborted; kept separate so a later run can
    /// retry exactly these
    pub failed: BTreeSet<String>,

    /// Index of the last fully processed target in the input list
    pub last_index: usize,

    /// Running total of review records durably written
    pub total_reviews: u64,

    /// When this checkpoint was saved
    pub saved_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn is_completed(&self, url: &str) -> bool {
        self.completed.contains(url)
    }

    pub fn is_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    /// Records a target as done; clears any failure from a prior run
    pub fn mark_completed(&mut self, url: &str) {
        self.failed.remove(url);
        self.completed.insert(url.to_string());
    }

    pub fn mark_failed(&mut self, url: &str) {
        self.failed.insert(url.to_string());
    }
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self {
            completed: BTreeSet::new(),
            failed: BTreeSet::new(),
            last_index: 0,
            total_reviews: 0,
            saved_at: Utc::now(),
        }
    }
}

/// File-backed checkpoint store
///
/// Saves go through a temp sibling file and an atomic rename, so a future
/// `load` sees either the previous checkpoint or the new one, never a
/// torn write.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the checkpoint, degrading gracefully
    ///
    /// An absent file starts a fresh run; an unreadable or corrupt file is
    /// logged as a warning and also starts fresh rather than failing.
    pub fn load(&self) -> Checkpoint {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No checkpoint found, starting from the beginning");
                return Checkpoint::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read checkpoint {}: {}, starting from the beginning",
                    self.path.display(),
                    e
                );
                return Checkpoint::default();
            }
        };

        match serde_json::from_str::<Checkpoint>(&content) {
            Ok(checkpoint) => {
                tracing::info!(
                    "Checkpoint loaded: {} completed, {} failed, {} reviews written",
                    checkpoint.completed.len(),
                    checkpoint.failed.len(),
                    checkpoint.total_reviews
                );
                checkpoint
            }
            Err(e) => {
                tracing::warn!(
                    "Checkpoint {} is corrupt: {}, starting from the beginning",
                    self.path.display(),
                    e
                );
                Checkpoint::default()
            }
        }
    }

    /// Persists the checkpoint atomically
    ///
    /// Must be called only after the output buffer covering this
    /// checkpoint has been flushed.
    pub fn save(&self, checkpoint: &mut Checkpoint) -> Result<(), CheckpointError> {
        checkpoint.saved_at = Utc::now();
        let json = serde_json::to_string_pretty(checkpoint)?;

        let tmp_path = self.temp_path();
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Removes the checkpoint file to force a full re-run
    pub fn clear(&self) -> Result<(), CheckpointError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CheckpointStore {
        CheckpointStore::new(dir.path().join("checkpoint.json"))
    }

    #[test]
    fn test_load_absent_returns_default() {
        let dir = TempDir::new().unwrap();
        let checkpoint = store_in(&dir).load();
        assert!(checkpoint.completed.is_empty());
        assert!(checkpoint.failed.is_empty());
        assert_eq!(checkpoint.total_reviews, 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut checkpoint = Checkpoint::default();
        checkpoint.mark_completed("https://example.com/a");
        checkpoint.mark_failed("https://example.com/b");
        checkpoint.last_index = 1;
        checkpoint.total_reviews = 12;
        store.save(&mut checkpoint).unwrap();

        let loaded = store.load();
        assert!(loaded.is_completed("https://example.com/a"));
        assert!(loaded.is_failed("https://example.com/b"));
        assert_eq!(loaded.last_index, 1);
        assert_eq!(loaded.total_reviews, 12);
    }

    #[test]
    fn test_load_corrupt_returns_default() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        let checkpoint = store.load();
        assert!(checkpoint.completed.is_empty());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&mut Checkpoint::default()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["checkpoint.json"]);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&mut Checkpoint::default()).unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());

        // Clearing an absent checkpoint is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_mark_completed_clears_failure() {
        let mut checkpoint = Checkpoint::default();
        checkpoint.mark_failed("https://example.com/a");
        checkpoint.mark_completed("https://example.com/a");

        assert!(checkpoint.is_completed("https://example.com/a"));
        assert!(!checkpoint.is_failed("https://example.com/a"));
    }
}
