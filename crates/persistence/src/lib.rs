#![deny(warnings)]

//! Persistence layer: save storage with backup fallback and
//! import/export.
//!
//! The engine never talks to a storage medium directly. A
//! [`SaveStore`] abstracts the medium (files locally, memory in
//! tests); [`SaveManager`] layers the save protocol on top: every
//! write first copies the current primary save to a backup slot, and
//! a corrupted primary falls back to that backup before the caller
//! ever sees [`GameError::InvalidSaveData`]. Store failures never
//! leave the engine state invalid.

use game_core::GameError;
use game_state::{GameState, SaveData};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default key for the primary save slot.
pub const PRIMARY_SAVE_KEY: &str = "resume-tycoon-save";
/// Default key for the backup slot.
pub const BACKUP_SAVE_KEY: &str = "resume-tycoon-backup";

/// A fallible key/value storage medium for serialized saves.
pub trait SaveStore {
    fn read(&self, key: &str) -> Result<Option<String>, GameError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), GameError>;
    fn remove(&mut self, key: &str) -> Result<(), GameError>;
}

/// In-memory store for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, GameError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), GameError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a root directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl SaveStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, GameError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GameError::StorageUnavailable(e.to_string())),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| GameError::StorageUnavailable(e.to_string()))?;
        fs::write(self.path_for(key), value)
            .map_err(|e| GameError::StorageUnavailable(e.to_string()))
    }

    fn remove(&mut self, key: &str) -> Result<(), GameError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GameError::StorageUnavailable(e.to_string())),
        }
    }
}

/// Where a successful load got its data from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Primary,
    Backup,
}

/// The save/load/import/export protocol over a [`SaveStore`].
pub struct SaveManager<S: SaveStore> {
    pub store: S,
    primary_key: String,
    backup_key: String,
}

impl<S: SaveStore> SaveManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            primary_key: PRIMARY_SAVE_KEY.to_string(),
            backup_key: BACKUP_SAVE_KEY.to_string(),
        }
    }

    /// Copy the current primary save into the backup slot, if any.
    fn back_up_current(&mut self) -> Result<(), GameError> {
        if let Some(current) = self.store.read(&self.primary_key)? {
            self.store.write(&self.backup_key, &current)?;
        }
        Ok(())
    }

    /// Serialize the state and write it to the primary slot, backing
    /// up the previous save first.
    pub fn save(&mut self, state: &GameState) -> Result<(), GameError> {
        let data = state.to_save();
        let json = serde_json::to_string(&data)
            .map_err(|e| GameError::InvalidSaveData(e.to_string()))?;
        self.back_up_current()?;
        self.store.write(&self.primary_key, &json)?;
        info!(bytes = json.len(), "game saved");
        Ok(())
    }

    fn parse_and_apply(
        state: &mut GameState,
        contents: &str,
        now_ms: i64,
    ) -> Result<(), GameError> {
        let data: SaveData = serde_json::from_str(contents)
            .map_err(|e| GameError::InvalidSaveData(e.to_string()))?;
        state.apply_save(&data, now_ms)
    }

    /// Load the primary save into `state`; on a corrupted primary,
    /// fall back to the most recent backup before reporting failure.
    /// `Ok(None)` means no save exists at all.
    pub fn load(
        &mut self,
        state: &mut GameState,
        now_ms: i64,
    ) -> Result<Option<LoadSource>, GameError> {
        let primary = self.store.read(&self.primary_key)?;
        if let Some(contents) = primary {
            match Self::parse_and_apply(state, &contents, now_ms) {
                Ok(()) => return Ok(Some(LoadSource::Primary)),
                Err(primary_err) => {
                    warn!(%primary_err, "primary save corrupted, trying backup");
                    if let Some(backup) = self.store.read(&self.backup_key)? {
                        if Self::parse_and_apply(state, &backup, now_ms).is_ok() {
                            return Ok(Some(LoadSource::Backup));
                        }
                    }
                    return Err(primary_err);
                }
            }
        }
        Ok(None)
    }

    /// Pretty-printed JSON for a downloadable save file.
    pub fn export(&self, state: &GameState) -> Result<String, GameError> {
        serde_json::to_string_pretty(&state.to_save())
            .map_err(|e| GameError::InvalidSaveData(e.to_string()))
    }

    /// Apply imported file contents, then persist them as the new
    /// primary save. The previous save is backed up first, and an
    /// invalid import leaves both the state and the slots untouched.
    pub fn import(
        &mut self,
        state: &mut GameState,
        contents: &str,
        now_ms: i64,
    ) -> Result<(), GameError> {
        Self::parse_and_apply(state, contents, now_ms)?;
        self.back_up_current()?;
        self.save(state)?;
        info!("save imported");
        Ok(())
    }

    /// Remove both save slots.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.store.remove(&self.primary_key)?;
        self.store.remove(&self.backup_key)?;
        info!("save data cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_state::GameConfig;
    use rust_decimal::Decimal;

    fn state_with(resumes: i64) -> GameState {
        let mut state = GameState::new(GameConfig::default(), 0);
        state.add_auto_resumes(Decimal::new(resumes, 0));
        state
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut manager = SaveManager::new(MemoryStore::default());
        let state = state_with(12_345);
        manager.save(&state).unwrap();

        let mut restored = GameState::new(GameConfig::default(), 0);
        let source = manager.load(&mut restored, 0).unwrap();
        assert_eq!(source, Some(LoadSource::Primary));
        assert_eq!(restored.resumes, Decimal::new(12_345, 0));
    }

    #[test]
    fn load_without_any_save_is_none() {
        let mut manager = SaveManager::new(MemoryStore::default());
        let mut state = GameState::new(GameConfig::default(), 0);
        assert_eq!(manager.load(&mut state, 0).unwrap(), None);
    }

    #[test]
    fn corrupted_primary_falls_back_to_backup() {
        let mut manager = SaveManager::new(MemoryStore::default());
        let state = state_with(777);
        manager.save(&state).unwrap();
        // A second save moves the good copy into the backup slot.
        manager.save(&state).unwrap();
        manager
            .store
            .write(PRIMARY_SAVE_KEY, "{\"not\":\"a save\"}")
            .unwrap();

        let mut restored = GameState::new(GameConfig::default(), 0);
        let source = manager.load(&mut restored, 0).unwrap();
        assert_eq!(source, Some(LoadSource::Backup));
        assert_eq!(restored.resumes, Decimal::new(777, 0));
    }

    #[test]
    fn corrupted_primary_and_backup_reports_invalid() {
        let mut manager = SaveManager::new(MemoryStore::default());
        manager.store.write(PRIMARY_SAVE_KEY, "garbage").unwrap();
        manager.store.write(BACKUP_SAVE_KEY, "also garbage").unwrap();

        let mut state = GameState::new(GameConfig::default(), 0);
        let err = manager.load(&mut state, 0).unwrap_err();
        assert!(matches!(err, GameError::InvalidSaveData(_)));
    }

    #[test]
    fn export_import_round_trips() {
        let mut manager = SaveManager::new(MemoryStore::default());
        let state = state_with(999);
        let exported = manager.export(&state).unwrap();

        let mut imported = GameState::new(GameConfig::default(), 0);
        manager.import(&mut imported, &exported, 0).unwrap();
        assert_eq!(imported.resumes, Decimal::new(999, 0));
        // The import was also persisted as the new primary save.
        let mut reloaded = GameState::new(GameConfig::default(), 0);
        assert_eq!(
            manager.load(&mut reloaded, 0).unwrap(),
            Some(LoadSource::Primary)
        );
        assert_eq!(reloaded.resumes, Decimal::new(999, 0));
    }

    #[test]
    fn invalid_import_leaves_state_untouched() {
        let mut manager = SaveManager::new(MemoryStore::default());
        let mut state = state_with(5);
        let err = manager.import(&mut state, "{\"resumes\":\"x\"}", 0).unwrap_err();
        assert!(matches!(err, GameError::InvalidSaveData(_)));
        assert_eq!(state.resumes, Decimal::new(5, 0));
    }

    #[test]
    fn reset_clears_both_slots() {
        let mut manager = SaveManager::new(MemoryStore::default());
        let state = state_with(1);
        manager.save(&state).unwrap();
        manager.save(&state).unwrap();
        manager.reset().unwrap();
        let mut restored = GameState::new(GameConfig::default(), 0);
        assert_eq!(manager.load(&mut restored, 0).unwrap(), None);
    }

    #[test]
    fn file_store_round_trips_and_tolerates_missing() {
        let root = std::env::temp_dir().join(format!(
            "resume-tycoon-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut store = FileStore::new(&root);
        assert_eq!(store.read("missing").unwrap(), None);
        store.write("slot", "{\"v\":1}").unwrap();
        assert_eq!(store.read("slot").unwrap().as_deref(), Some("{\"v\":1}"));
        store.remove("slot").unwrap();
        store.remove("slot").unwrap();
        assert_eq!(store.read("slot").unwrap(), None);
        let _ = fs::remove_dir_all(&root);
    }
}
