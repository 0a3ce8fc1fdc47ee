// Whole-collection JSON codec over a StorageBackend
//
// Reads fail closed: a missing key, an unreadable backend or a document that does
// not decode as the expected array all come back as an empty collection.

use crate::store::backend::StorageBackend;
use crate::FarewellError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Load the JSON array stored under `key`, or an empty Vec when it is unusable.
pub fn load_collection<T: DeserializeOwned>(backend: &dyn StorageBackend, key: &str) -> Vec<T> {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "storage read failed, using empty collection");
            return Vec::new();
        }
    };

    parse_or_default(key, &raw)
}

/// Decode `raw` as a JSON array of `T`, falling back to an empty Vec.
///
/// A single record that fails to decode discards the whole array.
pub fn parse_or_default<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(
                key,
                error = %e,
                "malformed collection in storage, using empty collection; the next write replaces it"
            );
            Vec::new()
        }
    }
}

/// Overwrite the whole collection under `key`.
pub fn store_collection<T: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    items: &[T],
) -> Result<(), FarewellError> {
    let value = serde_json::to_string(items)?;
    backend.put(key, &value).map_err(FarewellError::Storage)?;
    tracing::debug!(key, count = items.len(), "collection persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::backend::MemoryStorage;

    #[test]
    fn test_missing_key_is_empty() {
        let storage = MemoryStorage::new();
        let names: Vec<String> = load_collection(&storage, "farewell-names");
        assert!(names.is_empty());
    }

    #[test]
    fn test_malformed_json_is_empty() {
        let storage = MemoryStorage::new();
        storage.put("farewell-names", "{not json").unwrap();
        let names: Vec<String> = load_collection(&storage, "farewell-names");
        assert!(names.is_empty());
    }

    #[test]
    fn test_wrong_shape_is_empty() {
        let storage = MemoryStorage::new();
        storage.put("farewell-names", "{\"a\": 1}").unwrap();
        let names: Vec<String> = load_collection(&storage, "farewell-names");
        assert!(names.is_empty());

        storage.put("farewell-names", "[1, 2, 3]").unwrap();
        let names: Vec<String> = load_collection(&storage, "farewell-names");
        assert!(names.is_empty());
    }

    #[test]
    fn test_store_then_load() {
        let storage = MemoryStorage::new();
        let names = vec!["Asha".to_string(), "Bilal".to_string()];
        store_collection(&storage, "farewell-names", &names).unwrap();

        assert_eq!(
            storage.get("farewell-names").unwrap().as_deref(),
            Some("[\"Asha\",\"Bilal\"]")
        );
        let loaded: Vec<String> = load_collection(&storage, "farewell-names");
        assert_eq!(loaded, names);
    }
}
