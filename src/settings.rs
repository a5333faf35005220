use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::error::AlignmentError;

/// Key/value persistence used for user preferences.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, AlignmentError>;
    fn set(&self, key: &str, value: Value) -> Result<(), AlignmentError>;
}

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, AlignmentError> {
        let values = self
            .values
            .lock()
            .map_err(|e| AlignmentError::runtime("settings lock", e))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), AlignmentError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| AlignmentError::runtime("settings lock", e))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stores settings as one JSON object in a file; a missing file reads as empty.
#[derive(Debug)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, AlignmentError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(AlignmentError::io("read settings file", e)),
        };
        if data.trim().is_empty() {
            return Ok(Map::new());
        }
        let parsed = serde_json::from_str::<Value>(&data)
            .map_err(|e| AlignmentError::json("parse settings file", e))?;
        match parsed {
            Value::Object(map) => Ok(map),
            other => Err(AlignmentError::invalid_input(
                "settings file",
                format!(
                    "{} must hold a JSON object, found {other}",
                    self.path.display()
                ),
            )),
        }
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, AlignmentError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), AlignmentError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| AlignmentError::runtime("settings lock", e))?;
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AlignmentError::io("create settings directory", e))?;
        }
        let data = serde_json::to_string_pretty(&Value::Object(all))
            .map_err(|e| AlignmentError::json("serialize settings", e))?;
        std::fs::write(&self.path, data).map_err(|e| AlignmentError::io("write settings file", e))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get("colorScheme").unwrap(), None);
        store.set("colorScheme", json!("pastel")).unwrap();
        assert_eq!(store.get("colorScheme").unwrap(), Some(json!("pastel")));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let store = JsonFileSettingsStore::new("/nonexistent/kata_align/settings.json");
        assert_eq!(store.get("accessibilityMode").unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = std::env::temp_dir().join("kata_align_settings_store_test");
        let path = dir.join("settings.json");
        let _ = std::fs::remove_file(&path);

        let store = JsonFileSettingsStore::new(&path);
        store.set("colorScheme", json!("monochrome")).unwrap();
        store.set("accessibilityMode", json!(true)).unwrap();

        let reopened = JsonFileSettingsStore::new(&path);
        assert_eq!(reopened.get("colorScheme").unwrap(), Some(json!("monochrome")));
        assert_eq!(reopened.get("accessibilityMode").unwrap(), Some(json!(true)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_rejects_non_object() {
        let path = std::env::temp_dir().join("kata_align_settings_not_object.json");
        std::fs::write(&path, "[1, 2, 3]").expect("write settings");
        let store = JsonFileSettingsStore::new(&path);
        assert!(matches!(
            store.get("colorScheme"),
            Err(AlignmentError::InvalidInput { .. })
        ));
        let _ = std::fs::remove_file(&path);
    }
}
