//! Storage for the single API key secret.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;

/// Name the secret is stored under.
pub const API_KEY_NAME: &str = "tts_gemini_api_key";

pub trait KeyStore: Send + Sync {
    fn get(&self) -> anyhow::Result<Option<String>>;
    fn set(&self, value: &str) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

/// JSON file holding `{ "tts_gemini_api_key": "..." }`.
///
/// Other entries in the file are preserved on write.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> anyhow::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not a JSON object of strings", self.path.display()))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl KeyStore for FileKeyStore {
    fn get(&self) -> anyhow::Result<Option<String>> {
        Ok(self.read_all()?.remove(API_KEY_NAME))
    }

    fn set(&self, value: &str) -> anyhow::Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(API_KEY_NAME.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn clear(&self) -> anyhow::Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(API_KEY_NAME).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    value: Mutex<Option<String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self) -> anyhow::Result<Option<String>> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, value: &str) -> anyhow::Result<()> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_file_has_no_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyStore::new(dir.path().join("keys.json"));
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("keys.json");
        let store = FileKeyStore::new(&path);

        store.set("secret-1").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("secret-1"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[API_KEY_NAME], "secret-1");

        store.set("secret-2").unwrap();
        assert_eq!(FileKeyStore::new(&path).get().unwrap().as_deref(), Some("secret-2"));
    }

    #[test]
    fn test_file_store_preserves_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        fs::write(&path, r#"{"other":"kept"}"#).unwrap();
        let store = FileKeyStore::new(&path);

        store.set("k").unwrap();
        store.clear().unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("other").map(String::as_str), Some("kept"));
        assert!(!raw.contains_key(API_KEY_NAME));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        fs::write(&path, "not json").unwrap();
        assert!(FileKeyStore::new(&path).get().is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKeyStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set("abc").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
