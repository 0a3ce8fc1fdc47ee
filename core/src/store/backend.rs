// Storage abstraction for the farewell collections
//
// Every collection is a single JSON document under a fixed key, so the port only
// needs whole-value reads and writes. Browser builds plug in window.localStorage
// from the wasm crate; native builds use sled.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key-value storage port the data layer is written against
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn put(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
    fn flush(&self) -> Result<(), String>;
}

/// In-memory storage useful for testing and ephemeral sessions
#[derive(Clone, Default)]
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let data = self.data.read().map_err(|e| e.to_string())?;
        Ok(data.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), String> {
        self.data
            .write()
            .map_err(|e| e.to_string())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.data.write().map_err(|e| e.to_string())?.remove(key);
        Ok(())
    }

    fn flush(&self) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub struct SledStorage {
    db: sled::Db,
}

#[cfg(not(target_arch = "wasm32"))]
impl SledStorage {
    pub fn new(path: &str) -> std::result::Result<Self, String> {
        let db = sled::open(path).map_err(|e| e.to_string())?;
        Ok(Self { db })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl StorageBackend for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let value = self.db.get(key.as_bytes()).map_err(|e| e.to_string())?;
        match value {
            Some(ivec) => String::from_utf8(ivec.to_vec())
                .map(Some)
                .map_err(|e| e.to_string()),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), String> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.db.remove(key.as_bytes()).map_err(|e| e.to_string())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), String> {
        self.db.flush().map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_put_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.put("farewell-names", "[\"Asha\"]").unwrap();
        assert_eq!(
            storage.get("farewell-names").unwrap().as_deref(),
            Some("[\"Asha\"]")
        );

        storage.remove("farewell-names").unwrap();
        assert_eq!(storage.get("farewell-names").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_clones_share_data() {
        let storage = MemoryStorage::new();
        let view = storage.clone();
        storage.put("k", "v").unwrap();
        assert_eq!(view.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_sled_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SledStorage::new(dir.path().to_str().unwrap()).unwrap();

        storage.put("farewell-contacts", "[]").unwrap();
        storage.flush().unwrap();
        assert_eq!(
            storage.get("farewell-contacts").unwrap().as_deref(),
            Some("[]")
        );
        assert_eq!(storage.get("missing").unwrap(), None);
    }
}
