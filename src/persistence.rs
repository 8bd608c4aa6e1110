// File: src/persistence.rs
use crate::core::types::FamiliarityStore;
use crate::error::{LabError, Result};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Backing storage for the familiarity store. Absence of stored data is a
/// valid initial state and is reported as `Ok(None)`, not as an error.
pub trait FamiliarityStorage: Send + Sync {
    fn load(&self) -> Result<Option<FamiliarityStore>>;
    fn save(&self, store: &FamiliarityStore) -> Result<()>;
    /// Deletes everything stored. Removing nothing is not an error.
    fn remove(&self) -> Result<()>;
}

/// One JSON file holding a flat key -> count map.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, e: impl std::fmt::Display) -> LabError {
        LabError::storage(format!("{}: {}", self.path.display(), e))
    }
}

impl FamiliarityStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<FamiliarityStore>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.unavailable(e)),
        };
        let store = serde_json::from_reader(BufReader::new(file)).map_err(|e| self.unavailable(e))?;
        Ok(Some(store))
    }

    fn save(&self, store: &FamiliarityStore) -> Result<()> {
        let parent_dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir).map_err(|e| self.unavailable(e))?;

        // Written beside the target, then renamed over it.
        let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| self.unavailable(e))?;
        {
            let mut writer = BufWriter::new(temp_file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, store).map_err(|e| self.unavailable(e))?;
            writer.flush().map_err(|e| self.unavailable(e))?;
        }
        temp_file.persist(&self.path).map_err(|e| self.unavailable(e))?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.unavailable(e)),
        }
    }
}

/// Process-local storage, used when no file should be touched.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<FamiliarityStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FamiliarityStorage for MemoryStorage {
    fn load(&self) -> Result<Option<FamiliarityStore>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, store: &FamiliarityStore) -> Result<()> {
        *self.slot.lock() = Some(store.clone());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_empty_start() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("familiarity.json"));
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn saves_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested").join("familiarity.json"));
        let store: FamiliarityStore = [("الله", 3), ("رب", 1)].into_iter().collect();
        storage.save(&store).unwrap();
        assert_eq!(storage.load().unwrap(), Some(store));

        let raw = fs::read_to_string(storage.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["الله"], 3);
    }

    #[test]
    fn corrupt_file_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("familiarity.json");
        fs::write(&path, "{ not json").unwrap();
        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.load(), Err(LabError::StorageUnavailable(_))));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("familiarity.json"));
        storage.save(&FamiliarityStore::new()).unwrap();
        storage.remove().unwrap();
        assert!(!storage.path().exists());
        storage.remove().unwrap();
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load().unwrap(), None);
        let store: FamiliarityStore = [("w", 2)].into_iter().collect();
        storage.save(&store).unwrap();
        assert_eq!(storage.load().unwrap(), Some(store));
        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
