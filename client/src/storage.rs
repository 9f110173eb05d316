//! Persistent token storage
//!
//! The session token is the only piece of client state that survives a
//! restart. Storage is keyed like browser local storage, under `token`.

use serde_json::{Map, Value};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Key the token is stored under
pub const TOKEN_KEY: &str = "token";

/// Somewhere to keep the session token between runs
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Process-local storage, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// JSON file holding a string map, like a local storage area
///
/// Keys other than `token` are preserved on write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> io::Result<Map<String, Value>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Map::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(map)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, bytes)
    }
}

impl TokenStorage for FileStorage {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self
            .read_map()?
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn save(&self, token: &str) -> io::Result<()> {
        let mut map = self.read_map()?;
        map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_map(&map)
    }

    fn clear(&self) -> io::Result<()> {
        let mut map = self.read_map()?;
        if map.remove(TOKEN_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "college-admin-storage-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();

        storage.save("abc").unwrap();
        assert_eq!(clone.load().unwrap().as_deref(), Some("abc"));

        clone.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_token() {
        let path = temp_path("persist");
        let storage = FileStorage::new(&path);

        assert_eq!(storage.load().unwrap(), None);
        storage.save("abc.def.ghi").unwrap();

        // A fresh handle sees the same token, as after a reload
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("abc.def.ghi"));

        reopened.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let path = temp_path("other-keys");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();
        let storage = FileStorage::new(&path);

        storage.save("t").unwrap();
        storage.clear().unwrap();

        let raw: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"theme": "dark"}));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).load().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        std::fs::remove_file(&path).ok();
    }
}
