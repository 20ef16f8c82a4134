use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use jm_core::state::{flag_items, read_flag};
use jm_core::{ActivePage, ContentMessage, Error, FlagStore};

/// Enabled flag kept in a JSON object on disk, e.g. `{"censoringEnabled": true}`.
pub struct JsonFileStore {
    path: PathBuf,
    key: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, key: &str) -> Self {
        Self {
            path: path.into(),
            key: key.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored flag, or `None` when the file or key is absent.
    pub fn load(&self) -> Result<Option<bool>, String> {
        Ok(read_flag(&self.read_items()?, &self.key))
    }

    fn read_items(&self) -> Result<Value, String> {
        if !self.path.exists() {
            return Ok(Value::Object(Default::default()));
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read '{}': {}", self.path.display(), e))?;
        if content.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&content)
            .map_err(|e| format!("Invalid state file '{}': {}", self.path.display(), e))
    }
}

impl FlagStore for JsonFileStore {
    fn store(&mut self, enabled: bool) -> jm_core::Result<()> {
        let mut items = self.read_items().map_err(Error::Store)?;
        match items.as_object_mut() {
            Some(map) => {
                map.insert(self.key.clone(), Value::Bool(enabled));
            }
            None => items = flag_items(&self.key, enabled),
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("Failed to create '{}': {}", parent.display(), e)))?;
        }
        let text = serde_json::to_string_pretty(&items)?;
        fs::write(&self.path, text)
            .map_err(|e| Error::Store(format!("Failed to write '{}': {}", self.path.display(), e)))?;
        Ok(())
    }
}

/// The CLI has no page to notify.
pub struct NoActivePage;

impl ActivePage for NoActivePage {
    fn notify(&mut self, _message: &ContentMessage) -> jm_core::Result<()> {
        Err(Error::Delivery("no page context attached".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jm_core::{ToggleController, ToggleOutcome, STORAGE_KEY};

    #[test]
    fn test_missing_file_is_absent_flag() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"), STORAGE_KEY);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_store_round_trip_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut store = JsonFileStore::new(&path, STORAGE_KEY);
        store.store(false).unwrap();
        assert_eq!(store.load().unwrap(), Some(false));

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["theme"], "dark");
    }

    #[test]
    fn test_invalid_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path, STORAGE_KEY);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_toggle_with_cli_store_is_dropped_but_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::new(&path, STORAGE_KEY);
        let stored = store.load().unwrap();

        let mut controller = ToggleController::activate(stored, store, NoActivePage);
        assert!(controller.checked());
        assert_eq!(controller.change(false), ToggleOutcome::Dropped);
        assert_eq!(controller.store().load().unwrap(), Some(false));
    }
}
